//! ECharts options for the expense distribution chart.
//!
//! The client passes the options straight to `echarts.setOption`, so they
//! must be plain JSON without JavaScript functions.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    datatype::DataPointItem,
    element::{AxisPointer, AxisPointerType, AxisType, ItemStyle, Tooltip, Trigger},
    series::bar,
};

use crate::summary::PeriodTotals;

/// A bar per expense category, largest first, in the category's color.
pub fn expenses_chart(totals: &PeriodTotals) -> Chart {
    let labels: Vec<String> = totals
        .per_category_totals
        .iter()
        .map(|total| total.name.to_owned())
        .collect();

    let data: Vec<DataPointItem> = totals
        .per_category_totals
        .iter()
        .map(|total| {
            DataPointItem::new(total.total)
                .name(total.name)
                .item_style(ItemStyle::new().color(total.color))
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Expense Distribution"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(bar::Bar::new().name("Expenses").data(data))
}
