// src/services/destination_service.rs
// DOCUMENTATION: Read-only queries over the destinations dataset
// PURPOSE: Lookup, substring filter, prefix search and country listing

use crate::errors::TravelError;
use crate::models::{Coordinates, DestinationRecord};
use crate::services::dataset::Dataset;
use crate::services::sanitize::{filter_value, search_value};
use std::collections::HashSet;

const COUNTRY_FIELD: &str = "Country";
const LATITUDE_FIELD: &str = "Latitude";
const LONGITUDE_FIELD: &str = "Longitude";

pub struct DestinationService;

impl DestinationService {
    pub fn get_by_id<'a>(
        dataset: &'a Dataset,
        id: &str,
    ) -> Result<&'a DestinationRecord, TravelError> {
        dataset.find_by_id(id).ok_or_else(|| {
            log::warn!("Destination not found: {}", id);
            TravelError::NotFound("Destination not found".to_string())
        })
    }

    /// Coordinates of a destination; unparseable values become null
    pub fn coordinates(dataset: &Dataset, id: &str) -> Result<Coordinates, TravelError> {
        let record = Self::get_by_id(dataset, id.trim())?;
        let parse = |field: &str| {
            record
                .get(field)
                .and_then(|v| v.trim().parse::<f64>().ok())
        };

        Ok(Coordinates {
            latitude: parse(LATITUDE_FIELD),
            longitude: parse(LONGITUDE_FIELD),
        })
    }

    /// Substring filter used by GET /api/destinations
    /// DOCUMENTATION: Every parameter must name an exact column whose non-empty
    /// value contains the sanitized query value (case-insensitive)
    pub fn filter<'a>(
        dataset: &'a Dataset,
        params: &[(String, String)],
    ) -> Result<Vec<&'a DestinationRecord>, TravelError> {
        if params.is_empty() {
            return Err(TravelError::InvalidInput(
                "No search parameters provided.".to_string(),
            ));
        }

        let query: Vec<(&str, String)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), filter_value(v)))
            .collect();
        log::debug!("Sanitized filter query: {:?}", query);

        let results: Vec<&DestinationRecord> = dataset
            .records()
            .iter()
            .filter(|record| {
                query.iter().all(|(key, value)| match record.get(key) {
                    Some(field) if !field.is_empty() => field.to_lowercase().contains(value.as_str()),
                    _ => false,
                })
            })
            .collect();

        Self::non_empty(results)
    }

    /// Prefix search used by GET /api/search
    /// DOCUMENTATION: Keys resolve through normalized headers; values match the
    /// start of the trimmed field, case-insensitive
    pub fn search<'a>(
        dataset: &'a Dataset,
        params: &[(String, String)],
    ) -> Result<Vec<&'a DestinationRecord>, TravelError> {
        if params.is_empty() {
            return Err(TravelError::InvalidInput(
                "No search parameters provided.".to_string(),
            ));
        }

        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len());
        for (key, value) in params {
            match dataset.resolve_key(key) {
                Some(field) => {
                    log::debug!("Query key \"{}\" maps to dataset field \"{}\"", key, field);
                    query.push((field, search_value(value).to_lowercase()));
                }
                None => {
                    log::debug!("Query key \"{}\" does not match any dataset field", key);
                    return Self::non_empty(Vec::new());
                }
            }
        }

        let results: Vec<&DestinationRecord> = dataset
            .records()
            .iter()
            .filter(|record| {
                query.iter().all(|(field, value)| {
                    let field_value = record
                        .get(field)
                        .map(|v| v.trim().to_lowercase())
                        .unwrap_or_default();
                    !field_value.is_empty() && field_value.starts_with(value.as_str())
                })
            })
            .collect();

        log::info!("Search matched {} destinations", results.len());
        Self::non_empty(results)
    }

    /// Distinct non-empty countries in dataset order
    pub fn countries(dataset: &Dataset) -> Result<Vec<String>, TravelError> {
        let field = dataset.resolve_key(COUNTRY_FIELD).unwrap_or(COUNTRY_FIELD);
        let mut seen = HashSet::new();

        let countries: Vec<String> = dataset
            .records()
            .iter()
            .filter_map(|r| r.get(field))
            .map(str::trim)
            .filter(|c| !c.is_empty() && seen.insert(c.to_string()))
            .map(str::to_string)
            .collect();

        if countries.is_empty() {
            return Err(TravelError::NotFound("No countries found".to_string()));
        }

        Ok(countries)
    }

    /// Whether `id` is acceptable as a destination identifier
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= 64
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn non_empty(
        results: Vec<&DestinationRecord>,
    ) -> Result<Vec<&DestinationRecord>, TravelError> {
        if results.is_empty() {
            return Err(TravelError::NotFound(
                "No matching destinations found.".to_string(),
            ));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dataset::sample_dataset;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn names(records: &[&DestinationRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.get("Destination").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_get_by_id() {
        let dataset = sample_dataset();
        assert_eq!(
            DestinationService::get_by_id(&dataset, "2").unwrap().get("Destination"),
            Some("Florence")
        );
        assert!(matches!(
            DestinationService::get_by_id(&dataset, "99"),
            Err(TravelError::NotFound(_))
        ));
    }

    #[test]
    fn test_coordinates() {
        let dataset = sample_dataset();

        let rome = DestinationService::coordinates(&dataset, " 1 ").unwrap();
        assert_eq!(rome.latitude, Some(41.9028));
        assert_eq!(rome.longitude, Some(12.4964));

        let santorini = DestinationService::coordinates(&dataset, "5").unwrap();
        assert_eq!(santorini.latitude, None);
        assert_eq!(santorini.longitude, Some(25.4615));
    }

    #[test]
    fn test_filter_requires_params() {
        let dataset = sample_dataset();
        assert!(matches!(
            DestinationService::filter(&dataset, &[]),
            Err(TravelError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_filter_substring_case_insensitive() {
        let dataset = sample_dataset();
        let results =
            DestinationService::filter(&dataset, &params(&[("Country", " ITAL ")])).unwrap();
        assert_eq!(names(&results), vec!["Rome", "Florence"]);

        let results =
            DestinationService::filter(&dataset, &params(&[("Region", "tus"), ("Country", "italy")]))
                .unwrap();
        assert_eq!(names(&results), vec!["Florence"]);
    }

    #[test]
    fn test_filter_keys_are_exact() {
        let dataset = sample_dataset();
        assert!(matches!(
            DestinationService::filter(&dataset, &params(&[("country", "italy")])),
            Err(TravelError::NotFound(_))
        ));
    }

    #[test]
    fn test_search_prefix_with_normalized_keys() {
        let dataset = sample_dataset();

        let results =
            DestinationService::search(&dataset, &params(&[("destination", "\"fl\"")])).unwrap();
        assert_eq!(names(&results), vec!["Florence"]);

        // prefix, not substring
        assert!(DestinationService::search(&dataset, &params(&[("COUNTRY", "aly")])).is_err());

        let results = DestinationService::search(&dataset, &params(&[("Category", "city")])).unwrap();
        assert_eq!(names(&results), vec!["Rome", "Florence", "Paris"]);
    }

    #[test]
    fn test_search_unknown_key_matches_nothing() {
        let dataset = sample_dataset();
        let result = DestinationService::search(
            &dataset,
            &params(&[("Country", "Italy"), ("population", "1")]),
        );
        assert!(matches!(result, Err(TravelError::NotFound(_))));
    }

    #[test]
    fn test_countries_distinct_in_order() {
        let dataset = sample_dataset();
        let countries = DestinationService::countries(&dataset).unwrap();
        assert_eq!(countries, vec!["Italy", "France", "Austria", "Greece"]);
    }

    #[test]
    fn test_countries_empty_dataset() {
        let dataset = Dataset::from_reader("Destination,Country\nNowhere,\n".as_bytes()).unwrap();
        assert!(matches!(
            DestinationService::countries(&dataset),
            Err(TravelError::NotFound(_))
        ));
    }

    #[test]
    fn test_is_valid_id() {
        assert!(DestinationService::is_valid_id("12"));
        assert!(DestinationService::is_valid_id("rome-1_b"));
        assert!(!DestinationService::is_valid_id(""));
        assert!(!DestinationService::is_valid_id("1; DROP"));
    }
}
