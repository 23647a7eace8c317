//! randomuser.me record source.
//!
//! Wire shape (only the fields the directory uses):
//! `{ "results": [ { "login": { "uuid" }, "name": { "title", "first", "last" },
//!   "location": { "street": { "name", "number" }, "city", "state", "postcode",
//!   "coordinates": { "latitude", "longitude" } }, "email", "phone", "cell",
//!   "picture": { "large" } } ] }`
//!
//! Coordinates arrive as decimal strings and `postcode` may be a string or
//! a number.

use crate::config::SourceConfig;
use crate::model::geo::GeoPosition;
use crate::model::record::{Address, Contact, PersonName, Record};
use crate::source::{RecordSource, SourceError};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct WireResponse {
    results: Vec<WireUser>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    login: WireLogin,
    name: WireName,
    location: WireLocation,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    cell: String,
    #[serde(default)]
    picture: Option<WirePicture>,
}

#[derive(Debug, Deserialize)]
struct WireLogin {
    uuid: String,
}

#[derive(Debug, Deserialize)]
struct WireName {
    #[serde(default)]
    title: String,
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    street: WireStreet,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    postcode: Option<WirePostcode>,
    coordinates: WireCoordinates,
}

#[derive(Debug, Deserialize)]
struct WireStreet {
    name: String,
    number: u32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePostcode {
    Text(String),
    Number(i64),
}

impl WirePostcode {
    fn into_text(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCoordinates {
    latitude: String,
    longitude: String,
}

#[derive(Debug, Deserialize)]
struct WirePicture {
    large: String,
}

/// Decodes a randomuser response body into validated records.
///
/// Duplicate ids keep their first occurrence.
///
/// # Errors
/// - `Decode` for malformed JSON, ids, or coordinates.
/// - `InvalidRecord` for out-of-range positions.
pub fn decode_response(body: &str) -> Result<Vec<Record>, SourceError> {
    let response: WireResponse = serde_json::from_str(body)?;
    let mut seen = HashSet::with_capacity(response.results.len());
    let mut records = Vec::with_capacity(response.results.len());

    for (index, user) in response.results.into_iter().enumerate() {
        let record = decode_user(index, user)?;
        if seen.insert(record.id) {
            records.push(record);
        }
    }
    Ok(records)
}

fn decode_user(index: usize, user: WireUser) -> Result<Record, SourceError> {
    let id = Uuid::parse_str(user.login.uuid.trim()).map_err(|_| {
        SourceError::Decode(format!(
            "entry #{index}: invalid login.uuid `{}`",
            user.login.uuid
        ))
    })?;
    let position = GeoPosition::new(
        parse_degrees(index, "longitude", &user.location.coordinates.longitude)?,
        parse_degrees(index, "latitude", &user.location.coordinates.latitude)?,
    );

    let record = Record::new(
        id,
        PersonName::new(user.name.title, user.name.first, user.name.last),
        position,
    )
    .map_err(|source| SourceError::InvalidRecord { index, source })?
    .with_address(Address {
        street_name: user.location.street.name,
        street_number: user.location.street.number,
        city: user.location.city,
        state: user.location.state,
        postcode: user
            .location
            .postcode
            .map(WirePostcode::into_text)
            .unwrap_or_default(),
    })
    .with_contact(Contact {
        email: user.email,
        phone: user.phone,
        cell: user.cell,
    });

    Ok(match user.picture {
        Some(picture) => record.with_picture(picture.large),
        None => record,
    })
}

fn parse_degrees(index: usize, field: &str, raw: &str) -> Result<f64, SourceError> {
    raw.trim().parse::<f64>().map_err(|_| {
        SourceError::Decode(format!(
            "entry #{index}: invalid {field} `{raw}`"
        ))
    })
}

/// HTTP source backed by the randomuser.me API.
#[derive(Debug, Clone)]
pub struct RandomUserSource {
    client: Client,
    base_url: String,
    results: u32,
}

impl RandomUserSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            results: config.results,
        })
    }

    /// Request URL without query string.
    pub fn endpoint(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}

impl RecordSource for RandomUserSource {
    fn fetch(&self) -> Result<Vec<Record>, SourceError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("results", self.results)])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=source_fetch module=source status=error http_status={}",
                status.as_u16()
            );
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let records = decode_response(&body)?;
        info!(
            "event=source_fetch module=source status=ok requested={} received={}",
            self.results,
            records.len()
        );
        Ok(records)
    }
}
