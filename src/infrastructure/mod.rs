pub mod clock;
pub mod imaging;
pub mod logging;
