//! Customer profile payload
//!
//! The request body of `POST /predict`. Field names on the wire follow the
//! training dataset's column headers (mixed case), so the JSON a caller
//! sends matches the columns the model was trained on. Categorical fields
//! stay plain strings and are checked against their domain by the validator
//! layer, which keeps the rejection message in terms of the caller's input.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One field of a customer profile, viewed as model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Categorical(&'a str),
    Numeric(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerRecord {
    #[validate(custom(function = validate_gender))]
    pub gender: String,

    #[serde(rename = "SeniorCitizen")]
    #[validate(range(min = 0, max = 1, message = "must be 0 or 1"))]
    pub senior_citizen: i64,

    #[serde(rename = "Partner")]
    #[validate(custom(function = validate_yes_no))]
    pub partner: String,

    #[serde(rename = "Dependents")]
    #[validate(custom(function = validate_yes_no))]
    pub dependents: String,

    #[validate(range(min = 0, max = 100, message = "must be between 0 and 100 months"))]
    pub tenure: i64,

    #[serde(rename = "PhoneService")]
    #[validate(custom(function = validate_yes_no))]
    pub phone_service: String,

    #[serde(rename = "MultipleLines")]
    #[validate(custom(function = validate_multiple_lines))]
    pub multiple_lines: String,

    #[serde(rename = "InternetService")]
    #[validate(custom(function = validate_internet_service))]
    pub internet_service: String,

    #[serde(rename = "OnlineSecurity")]
    #[validate(custom(function = validate_internet_addon))]
    pub online_security: String,

    #[serde(rename = "OnlineBackup")]
    #[validate(custom(function = validate_internet_addon))]
    pub online_backup: String,

    #[serde(rename = "DeviceProtection")]
    #[validate(custom(function = validate_internet_addon))]
    pub device_protection: String,

    #[serde(rename = "TechSupport")]
    #[validate(custom(function = validate_internet_addon))]
    pub tech_support: String,

    #[serde(rename = "StreamingTV")]
    #[validate(custom(function = validate_internet_addon))]
    pub streaming_tv: String,

    #[serde(rename = "StreamingMovies")]
    #[validate(custom(function = validate_internet_addon))]
    pub streaming_movies: String,

    #[serde(rename = "Contract")]
    #[validate(custom(function = validate_contract))]
    pub contract: String,

    #[serde(rename = "PaperlessBilling")]
    #[validate(custom(function = validate_yes_no))]
    pub paperless_billing: String,

    #[serde(rename = "PaymentMethod")]
    #[validate(custom(function = validate_payment_method))]
    pub payment_method: String,

    #[serde(rename = "MonthlyCharges")]
    #[validate(range(min = 0.0, message = "must be a non-negative amount"))]
    pub monthly_charges: f64,

    #[serde(rename = "TotalCharges")]
    #[validate(range(min = 0.0, message = "must be a non-negative amount"))]
    pub total_charges: f64,
}

impl CustomerRecord {
    /// All nineteen fields under their wire names, in training-column order.
    pub fn fields(&self) -> [(&'static str, FieldValue<'_>); 19] {
        use FieldValue::{Categorical, Numeric};
        [
            ("gender", Categorical(&self.gender)),
            ("SeniorCitizen", Numeric(self.senior_citizen as f64)),
            ("Partner", Categorical(&self.partner)),
            ("Dependents", Categorical(&self.dependents)),
            ("tenure", Numeric(self.tenure as f64)),
            ("PhoneService", Categorical(&self.phone_service)),
            ("MultipleLines", Categorical(&self.multiple_lines)),
            ("InternetService", Categorical(&self.internet_service)),
            ("OnlineSecurity", Categorical(&self.online_security)),
            ("OnlineBackup", Categorical(&self.online_backup)),
            ("DeviceProtection", Categorical(&self.device_protection)),
            ("TechSupport", Categorical(&self.tech_support)),
            ("StreamingTV", Categorical(&self.streaming_tv)),
            ("StreamingMovies", Categorical(&self.streaming_movies)),
            ("Contract", Categorical(&self.contract)),
            ("PaperlessBilling", Categorical(&self.paperless_billing)),
            ("PaymentMethod", Categorical(&self.payment_method)),
            ("MonthlyCharges", Numeric(self.monthly_charges)),
            ("TotalCharges", Numeric(self.total_charges)),
        ]
    }
}

fn one_of(value: &str, allowed: &'static [&'static str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new("unknown_category");
    err.message = Some(format!("must be one of: {}", allowed.join(", ")).into());
    Err(err)
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["Female", "Male"])
}

fn validate_yes_no(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["Yes", "No"])
}

fn validate_multiple_lines(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["Yes", "No", "No phone service"])
}

fn validate_internet_service(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["DSL", "Fiber optic", "No"])
}

fn validate_internet_addon(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["Yes", "No", "No internet service"])
}

fn validate_contract(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["Month-to-month", "One year", "Two year"])
}

fn validate_payment_method(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &[
            "Electronic check",
            "Mailed check",
            "Bank transfer (automatic)",
            "Credit card (automatic)",
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::testutil;

    #[test]
    fn accepts_the_sample_profile() {
        let record = testutil::sample_record();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn deserializes_wire_field_names() {
        let record = testutil::sample_record();
        assert_eq!(record.gender, "Male");
        assert_eq!(record.senior_citizen, 0);
        assert_eq!(record.internet_service, "Fiber optic");
        assert_eq!(record.payment_method, "Electronic check");
        assert!((record.monthly_charges - 70.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_unknown_category() {
        let mut record = testutil::sample_record();
        record.contract = "Three year".to_string();
        let errors = record.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("contract"));
        assert!(errors.to_string().contains("must be one of"));
    }

    #[test]
    fn rejects_out_of_range_numerics() {
        let mut record = testutil::sample_record();
        record.tenure = -1;
        assert!(record.validate().is_err());

        let mut record = testutil::sample_record();
        record.tenure = 101;
        assert!(record.validate().is_err());

        let mut record = testutil::sample_record();
        record.senior_citizen = 2;
        assert!(record.validate().is_err());

        let mut record = testutil::sample_record();
        record.monthly_charges = -0.01;
        assert!(record.validate().is_err());
    }

    #[test]
    fn field_listing_follows_training_order() {
        let record = testutil::sample_record();
        let fields = record.fields();
        assert_eq!(fields.len(), 19);
        assert_eq!(fields[0].0, "gender");
        assert_eq!(fields[4].0, "tenure");
        assert_eq!(fields[18].0, "TotalCharges");
        assert_eq!(fields[1].1, FieldValue::Numeric(0.0));
        assert_eq!(fields[7].1, FieldValue::Categorical("Fiber optic"));
    }
}
