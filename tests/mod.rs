mod api_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Wage rule scenarios and config parsing through the public API
// - store_tests: Round-trips through the in-memory and file stores
// - service_tests: The roster actor's read-modify-write operations
// - api_tests: The JSON API driven without a network socket
