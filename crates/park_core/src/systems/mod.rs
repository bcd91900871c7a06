pub mod abandonment;
pub mod departure;
pub mod facility_arrival;
pub mod facility_retry;
pub mod instructor_return;
pub mod meal_end;
pub mod park_closing;
pub mod service;
pub mod service_complete;
pub mod simulation_started;
pub mod visitor_arrival;
pub mod visitor_decision;
