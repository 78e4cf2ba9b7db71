pub mod model;
pub mod notification;
pub mod page;
pub mod util;
pub mod validation;
