//! Rules that categorize transactions whose names contain a substring.
//!
//! Matching is case-sensitive and runs on names with runs of whitespace
//! collapsed. When several rules match a name, the most recently created rule
//! wins.

mod apply;
mod create;
mod db;
mod delete;
mod list;
mod matching;
mod models;

pub use apply::apply_rules_endpoint;
pub use create::create_rule_endpoint;
pub use db::create_rule_table;
pub use delete::delete_rule_endpoint;
pub use list::get_rules_endpoint;
pub use matching::{matches_rule, rule_for_name};
pub use models::Rule;
