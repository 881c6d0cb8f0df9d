use crate::wire::HealthRes;

/// Health check shared by every API surface.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Reports the service as alive.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Learning Hub is alive".into(),
        }
    }
}
