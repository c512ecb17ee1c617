mod appointments_test;
mod middleware_test;
mod routes_test;
mod slots_test;
