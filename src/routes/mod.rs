pub mod inbox_route;
