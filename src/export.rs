use crate::models::ApartmentRecord;
use anyhow::{Context, Result};
use std::path::Path;

/// Overwrite `path` with the records as a pretty-printed JSON array
pub async fn write_json(path: &Path, records: &[ApartmentRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AirbnbPotential, Currency};

    #[tokio::test]
    async fn test_write_json_array() {
        let record = ApartmentRecord {
            url: "https://www.ss.lv/msg/lv/a.html".to_string(),
            price: 500.0,
            currency: Currency::Eur,
            true_bedrooms: Some(2),
            total_rooms: None,
            bathrooms: Some(1),
            utilities_min: None,
            utilities_max: None,
            description: Some("Gaišs dzīvoklis".to_string()),
            posted_date: "2024-03-09".to_string(),
            property_type: "Izīrē".to_string(),
            is_daily_listing: true,
            airbnb_potential: AirbnbPotential::High,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("apartments.json");
        write_json(&path, &[record.clone()]).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Vec<ApartmentRecord> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vec![record]);
        assert!(written.contains("\"currency\": \"EUR\""));
        assert!(written.contains("\"airbnb_potential\": \"High\""));
    }
}
