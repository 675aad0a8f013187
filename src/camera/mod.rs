pub mod controller;
pub mod first_person;

// Re-export main types
pub use controller::{InputController, InputSnapshot};
pub use first_person::{FirstPersonCamera, FirstPersonCameraBounds};
