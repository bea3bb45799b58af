mod harness;
mod users;
