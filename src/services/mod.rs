pub mod analysis_service;
pub mod classification_service;
pub mod historical_service;
pub mod numeric;
pub mod portfolio_service;
pub mod risk_service;
pub mod spectral_service;
pub mod statistics;
pub mod supplemental_risk_service;
