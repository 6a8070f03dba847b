pub mod concepts;
pub mod feedback;
pub mod framework;
pub mod router;
pub mod table;
pub mod util;
