//! Scenario tests driving the dispatcher with a shared behavior file.

mod point_set_tests;
