pub use notifier_wire::{NotificationList, PaginationMetadata};
