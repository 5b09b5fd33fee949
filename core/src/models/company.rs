use serde::{Deserialize, Serialize};

use crate::model::ModelBase;

/// A regulatory district using the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyModel {
    #[serde(flatten)]
    pub base: ModelBase,
    pub key: String,
    pub tier_id: u64,
    pub name: String,
    pub brand_url: String,
    pub logo_url: String,
    pub slogan: String,
    pub export_out_of_district_fee: f64,
    pub water_usage_fee: f64,
    pub default_production_time_period: i32,
    pub standard_users_allowed: u32,
    pub super_users_allowed: u32,
    pub default_locale: String,
    pub countries: Vec<CountryModel>,
    pub states: Vec<StateModel>,
    pub counties: Vec<CountyModel>,
    #[serde(rename = "urls")]
    pub company_urls: Vec<CompanyUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyUrl {
    pub url: String,
    pub default: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountryModel {
    pub id: u64,
    pub fips: String,
    pub iso3166_alpha2: String,
    pub iso3166_alpha3: String,
    #[serde(rename = "iso3166Numeric3")]
    pub iso3166_numeric: String,
    pub name: String,
    pub name_long: String,
    pub abbreviation: String,
    pub postal: String,
    #[serde(rename = "formalEn")]
    pub formal_en: String,
    pub continent: String,
    #[serde(rename = "regionUn")]
    pub region_un: String,
    pub sub_region: String,
    pub states: Vec<StateModel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateModel {
    pub id: u64,
    pub country_id: u64,
    pub fips: String,
    pub iso31662: String,
    pub name: String,
    pub alt_name: String,
    pub region: String,
    pub postal: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region_sub: String,
    pub counties: Vec<CountyModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountyModel {
    pub id: u64,
    pub state_id: u64,
    pub fips: String,
    pub name: String,
}
