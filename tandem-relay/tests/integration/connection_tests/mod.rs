mod test_capacity_refused;
mod test_disconnect_removes_connection;
