pub mod search_nodes;
pub mod watch;
