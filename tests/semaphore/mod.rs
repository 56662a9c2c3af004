mod acquire;
mod conservation;
mod timeout;
