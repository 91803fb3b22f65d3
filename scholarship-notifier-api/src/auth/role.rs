//!
//! All roles used within application
//!

use strum::AsRefStr;

#[derive(AsRefStr)]
pub enum Role {
    #[strum(serialize = "scholarship_notifier_produce_notifications")]
    ProduceNotifications,
}
