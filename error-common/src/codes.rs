// Stable error codes returned in API error bodies

pub mod validation {
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
    pub const UNKNOWN_SYMPTOM: &str = "VALIDATION_1004";
}

pub mod authentication {
    pub const MISSING_TOKEN: &str = "AUTH_2001";
    pub const INVALID_TOKEN: &str = "AUTH_2002";
}

pub mod authorization {
    pub const INSUFFICIENT_SCOPE: &str = "AUTHZ_3001";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_4001";
}

pub mod prediction {
    pub const INFERENCE_FAILED: &str = "PREDICT_5001";
    pub const ARTIFACT_INVALID: &str = "PREDICT_5002";
}

pub mod system {
    pub const INTERNAL: &str = "SYSTEM_9001";
}
