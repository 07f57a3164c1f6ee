//! 实时通知模块
//!
//! [`Notifier`] fans order-lifecycle events out to every connected
//! subscriber (admin dashboards, customer tracking views).

pub mod bus;

pub use bus::{Notifier, NotifierConfig};
