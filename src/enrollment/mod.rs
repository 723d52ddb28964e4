//! Bank connections made through the account linking service.
//!
//! An enrollment stores the access token the sync process uses to fetch
//! transactions for one institution. Unlinking an enrollment keeps its
//! transactions.

mod core;
mod endpoints;

pub use core::{
    Enrollment, EnrollmentUpdate, create_enrollment, create_enrollment_table, delete_enrollment,
    get_enrollments, update_enrollment,
};
pub use endpoints::{
    create_enrollment_endpoint, delete_enrollment_endpoint, get_enrollments_endpoint,
    update_enrollment_endpoint,
};
