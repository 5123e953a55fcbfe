use std::collections::HashSet;

use lazy_static::lazy_static;
use log::warn;

use crate::error::ExtractError;

/// One logical field to extract: the name it is written under and the key chain
/// that locates it inside a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub output_name: String,
    pub path: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(output_name: impl Into<String>, path: &[&str]) -> Self {
        Self {
            output_name: output_name.into(),
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered, immutable list of field descriptors. Output order follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    fields: Vec<FieldDescriptor>,
}

impl FieldCatalog {
    /// Builds a catalog, rejecting empty paths and duplicate output names.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, ExtractError> {
        if fields.is_empty() {
            return Err(ExtractError::Catalog("No fields specified for extraction".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.path.is_empty() {
                return Err(ExtractError::Catalog(format!(
                    "field '{}' has an empty key path",
                    field.output_name
                )));
            }
            if !seen.insert(field.output_name.as_str()) {
                return Err(ExtractError::Catalog(format!(
                    "duplicate output name '{}'",
                    field.output_name
                )));
            }
        }

        Ok(Self { fields })
    }

    /// Parses a `--fields` specification such as `GBIF_ID=gbifID,TAXON=taxon.name`.
    /// A bare `a.b` entry is written under its own dotted path.
    pub fn parse(spec: &str) -> Result<Self, ExtractError> {
        let mut fields = Vec::new();

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, path_spec) = match entry.split_once('=') {
                Some((name, path)) => (name.trim(), path.trim()),
                None => (entry, entry),
            };

            let path: Vec<String> = path_spec
                .split('.')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();

            if name.is_empty() {
                warn!("Skipping field specification without a name: '{}'", entry);
                continue;
            }

            fields.push(FieldDescriptor {
                output_name: name.to_string(),
                path,
            });
        }

        Self::new(fields)
    }

    fn from_table(table: &[(&str, &[&str])]) -> Self {
        Self {
            fields: table
                .iter()
                .map(|(name, path)| FieldDescriptor::new(*name, path))
                .collect(),
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

const OCCURRENCE_FILE_FIELDS: &[(&str, &[&str])] = &[
    ("GBIF_ID", &["gbifID"]),
    ("DATASET_KEY", &["datasetKey"]),
    ("OCCURRENCE_ID", &["occurrenceID"]),
    ("KINGDOM", &["kingdom"]),
    ("PHYLUM", &["phylum"]),
    ("CLASS", &["class"]),
    ("ORDER", &["order"]),
    ("FAMILY", &["family"]),
    ("GENUS", &["genus"]),
    ("SPECIES", &["species"]),
    ("TAXON_RANK", &["taxonRank"]),
    ("SCIENTIFIC_NAME", &["scientificName"]),
    ("VERBATIM_SCIENTIFIC_NAME", &["verbatimScientificName"]),
    ("COUNTRY_CODE", &["countryCode"]),
    ("LOCALITY", &["locality"]),
    ("STATE_PROVINCE", &["stateProvince"]),
    ("OCCURRENCE_STATUS", &["occurrenceStatus"]),
    ("INDIVIDUAL_COUNT", &["individualCount"]),
    ("PUBLISHING_ORG_KEY", &["publishingOrgKey"]),
    ("DECIMAL_LATITUDE", &["decimalLatitude"]),
    ("DECIMAL_LONGITUDE", &["decimalLongitude"]),
    ("COORDINATE_UNCERTAINTY", &["coordinateUncertaintyInMeters"]),
    ("HABITAT", &["habitat"]),
    ("ELEVATION", &["elevation"]),
    ("DEPTH", &["depth"]),
    ("EVENT_DATE", &["eventDate"]),
    ("BASIS_OF_RECORD", &["basisOfRecord"]),
    ("INSTITUTION_CODE", &["institutionCode"]),
    ("COLLECTION_CODE", &["collectionCode"]),
    ("CATALOG_NUMBER", &["catalogNumber"]),
    ("RECORD_NUMBER", &["recordNumber"]),
    ("IDENTIFIED_BY", &["identifiedBy"]),
    ("DATE_IDENTIFIED", &["dateIdentified"]),
    ("RECORDED_BY", &["recordedBy"]),
    ("LICENSE", &["license"]),
];

const OCCURRENCE_SEARCH_FIELDS: &[(&str, &[&str])] = &[
    ("GBIF_ID", &["gbifID"]),
    ("SCIENTIFIC_NAME", &["scientificName"]),
    ("KINGDOM", &["kingdom"]),
    ("PHYLUM", &["phylum"]),
    ("CLASS", &["class"]),
    ("ORDER", &["order"]),
    ("FAMILY", &["family"]),
    ("GENUS", &["genus"]),
    ("SPECIES", &["species"]),
    ("DECIMAL_LATITUDE", &["decimalLatitude"]),
    ("DECIMAL_LONGITUDE", &["decimalLongitude"]),
    ("COUNTRY_CODE", &["countryCode"]),
    ("EVENT_DATE", &["eventDate"]),
    ("BASIS_OF_RECORD", &["basisOfRecord"]),
    ("DATASET_KEY", &["datasetKey"]),
    ("INSTITUTION_CODE", &["institutionCode"]),
    ("COLLECTION_CODE", &["collectionCode"]),
    ("CATALOG_NUMBER", &["catalogNumber"]),
    ("RECORDED_BY", &["recordedBy"]),
    ("OCCURRENCE_STATUS", &["occurrenceStatus"]),
    ("TAXON_RANK", &["taxonRank"]),
    ("COORDINATE_UNCERTAINTY", &["coordinateUncertaintyInMeters"]),
    ("HABITAT", &["habitat"]),
    ("LOCALITY", &["locality"]),
    ("VERBATIM_LOCALITY", &["verbatimLocality"]),
    ("ELEVATION", &["elevation"]),
    ("DEPTH", &["depth"]),
];

lazy_static! {
    /// Fields pulled from a downloaded occurrence document.
    pub static ref OCCURRENCE_FILE_CATALOG: FieldCatalog = FieldCatalog::from_table(OCCURRENCE_FILE_FIELDS);

    /// Fields pulled from a live occurrence search response.
    pub static ref OCCURRENCE_SEARCH_CATALOG: FieldCatalog = FieldCatalog::from_table(OCCURRENCE_SEARCH_FIELDS);
}

/// Returns the `--fields` catalog when one was given, otherwise a copy of the built-in one.
pub fn select_catalog(fields: Option<&str>, default: &FieldCatalog) -> Result<FieldCatalog, ExtractError> {
    match fields {
        Some(spec) => FieldCatalog::parse(spec),
        None => Ok(default.clone()),
    }
}
