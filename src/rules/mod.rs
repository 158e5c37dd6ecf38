pub mod clean;
pub mod colors;
pub mod headsigns;
pub mod routes;
pub mod stops;
