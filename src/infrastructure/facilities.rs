//! Facility directory backed by the static config list

use async_trait::async_trait;

use crate::config::FacilityConfig;
use crate::domain::error::BookingResult;
use crate::domain::ports::FacilityDirectory;

pub struct StaticFacilityDirectory {
    facilities: Vec<FacilityConfig>,
}

impl StaticFacilityDirectory {
    pub fn new(facilities: Vec<FacilityConfig>) -> Self {
        Self { facilities }
    }

    pub fn facilities(&self) -> &[FacilityConfig] {
        &self.facilities
    }
}

#[async_trait]
impl FacilityDirectory for StaticFacilityDirectory {
    async fn exists(&self, facility_id: &str) -> BookingResult<bool> {
        Ok(self.facilities.iter().any(|f| f.id == facility_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn knows_configured_facilities() {
        let dir = StaticFacilityDirectory::new(vec![FacilityConfig {
            id: "main-ground".to_string(),
            name: "Main Cricket Ground".to_string(),
        }]);
        assert!(dir.exists("main-ground").await.unwrap());
        assert!(!dir.exists("no-such-pitch").await.unwrap());
    }
}
