//! Form sections and their field catalogs

use super::field::{DropdownList, FieldSpec, FieldValue};
use crate::wizard::WizardError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flat mapping of field name to value for one section
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Named subset of form fields, one per data-entry step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionName {
    DealBasics,
    CommercialTerms,
    PaymentTerms,
}

const DEAL_BASICS_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("seller", "Seller"),
    FieldSpec::text("buyer", "Buyer"),
    FieldSpec::choice("material", "Material", DropdownList::Materials),
    FieldSpec::number("quantity", "Quantity (DMT)"),
    FieldSpec::number("quantityTolerance", "Quantity Tolerance (%)"),
];

const COMMERCIAL_TERMS_FIELDS: &[FieldSpec] = &[
    FieldSpec::choice("deliveryTerm", "Delivery Term", DropdownList::DeliveryTerms),
    FieldSpec::text("deliveryPoint", "Delivery Point"),
    FieldSpec::choice("deliveryMode", "Delivery Mode", DropdownList::DeliveryModes),
    FieldSpec::text("shipmentPeriod", "Shipment Period"),
    FieldSpec::choice("packaging", "Packaging", DropdownList::Packaging),
    FieldSpec::number("tcUsdPerDmt", "TC (USD/DMT)"),
    FieldSpec::number("rcAgUsdPerToz", "RC Ag (USD/toz)"),
    FieldSpec::flag("transportationCredit", "Transportation Credit"),
    FieldSpec::text("otherPayables", "Other Payables"),
];

const PAYMENT_TERMS_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("paymentMethod", "Payment Method"),
    FieldSpec::choice("currency", "Currency", DropdownList::Currencies),
    FieldSpec::number("prepaymentPercentage", "Prepayment (%)"),
    FieldSpec::number("provisionalPercentage", "Provisional (%)"),
    FieldSpec::number("finalPercentage", "Final (%)"),
    FieldSpec::text("wsmdLocation", "WSMD Location"),
    FieldSpec::number("costSharingPercentage", "Cost Sharing (%)"),
    FieldSpec::choice("surveyor", "Surveyor", DropdownList::Surveyors),
];

impl SectionName {
    pub const ALL: [SectionName; 3] = [
        SectionName::DealBasics,
        SectionName::CommercialTerms,
        SectionName::PaymentTerms,
    ];

    /// Name used in form data (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DealBasics => "dealBasics",
            Self::CommercialTerms => "commercialTerms",
            Self::PaymentTerms => "paymentTerms",
        }
    }

    /// Key used in backend request bodies
    pub fn wire_key(&self) -> &'static str {
        match self {
            Self::DealBasics => "deal_basics",
            Self::CommercialTerms => "commercial_terms",
            Self::PaymentTerms => "payment_terms",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DealBasics => "Deal Basics",
            Self::CommercialTerms => "Commercial Terms",
            Self::PaymentTerms => "Payment Terms",
        }
    }

    /// Field catalog in display order
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::DealBasics => DEAL_BASICS_FIELDS,
            Self::CommercialTerms => COMMERCIAL_TERMS_FIELDS,
            Self::PaymentTerms => PAYMENT_TERMS_FIELDS,
        }
    }

    /// Catalog entry for a field name in any section
    pub fn find_field(name: &str) -> Option<&'static FieldSpec> {
        Self::ALL
            .into_iter()
            .flat_map(|section| section.fields())
            .find(|spec| spec.name == name)
    }

    /// Default values a fresh wizard starts with
    pub fn defaults(&self) -> FieldMap {
        let mut map: FieldMap = self
            .fields()
            .iter()
            .map(|spec| (spec.name.to_string(), FieldValue::default()))
            .collect();

        let overrides: Vec<(&str, FieldValue)> = match self {
            Self::DealBasics => vec![
                ("seller", "Open Mineral".into()),
                ("quantityTolerance", FieldValue::Number(10.0)),
            ],
            Self::CommercialTerms => vec![("transportationCredit", false.into())],
            Self::PaymentTerms => vec![
                ("currency", "USD".into()),
                ("costSharingPercentage", FieldValue::Number(50.0)),
            ],
        };
        for (name, value) in overrides {
            map.insert(name.to_string(), value);
        }
        map
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| WizardError::UnknownSection(s.to_string()))
    }
}

/// All three data-entry sections of a deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSections {
    pub deal_basics: FieldMap,
    pub commercial_terms: FieldMap,
    pub payment_terms: FieldMap,
}

impl Default for FormSections {
    fn default() -> Self {
        Self {
            deal_basics: SectionName::DealBasics.defaults(),
            commercial_terms: SectionName::CommercialTerms.defaults(),
            payment_terms: SectionName::PaymentTerms.defaults(),
        }
    }
}

impl FormSections {
    pub fn section(&self, name: SectionName) -> &FieldMap {
        match name {
            SectionName::DealBasics => &self.deal_basics,
            SectionName::CommercialTerms => &self.commercial_terms,
            SectionName::PaymentTerms => &self.payment_terms,
        }
    }

    fn section_mut(&mut self, name: SectionName) -> &mut FieldMap {
        match name {
            SectionName::DealBasics => &mut self.deal_basics,
            SectionName::CommercialTerms => &mut self.commercial_terms,
            SectionName::PaymentTerms => &mut self.payment_terms,
        }
    }

    /// Shallow-merge `partial` into a section; keys not in `partial` are kept
    pub fn merge(&mut self, name: SectionName, partial: FieldMap) {
        self.section_mut(name).extend(partial);
    }

    pub fn value(&self, name: SectionName, field: &str) -> Option<&FieldValue> {
        self.section(name).get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldKind;
    use pretty_assertions::assert_eq;

    fn partial(pairs: &[(&str, FieldValue)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_prefill_seller_currency_cost_sharing() {
        let form = FormSections::default();
        assert_eq!(
            form.value(SectionName::DealBasics, "seller"),
            Some(&FieldValue::from("Open Mineral"))
        );
        assert_eq!(
            form.value(SectionName::PaymentTerms, "currency"),
            Some(&FieldValue::from("USD"))
        );
        assert_eq!(
            form.value(SectionName::PaymentTerms, "costSharingPercentage"),
            Some(&FieldValue::Number(50.0))
        );
        assert_eq!(
            form.value(SectionName::DealBasics, "quantityTolerance"),
            Some(&FieldValue::Number(10.0))
        );
    }

    #[test]
    fn test_defaults_cover_every_catalog_field() {
        for section in SectionName::ALL {
            let defaults = section.defaults();
            for spec in section.fields() {
                assert!(
                    defaults.contains_key(spec.name),
                    "{} missing default for {}",
                    section,
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_sequential_merges_second_wins_untouched_kept() {
        for section in SectionName::ALL {
            let mut form = FormSections::default();
            let before = form.section(section).clone();

            form.merge(
                section,
                partial(&[("alpha", "1".into()), ("beta", FieldValue::Number(2.0))]),
            );
            form.merge(
                section,
                partial(&[("beta", FieldValue::Number(3.0)), ("gamma", true.into())]),
            );

            let merged = form.section(section);
            assert_eq!(merged.get("alpha"), Some(&FieldValue::from("1")));
            assert_eq!(merged.get("beta"), Some(&FieldValue::Number(3.0)));
            assert_eq!(merged.get("gamma"), Some(&FieldValue::Flag(true)));
            for (key, value) in &before {
                assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    #[test]
    fn test_merge_only_touches_target_section() {
        let mut form = FormSections::default();
        form.merge(SectionName::DealBasics, partial(&[("buyer", "Acme".into())]));
        assert_eq!(
            form.commercial_terms,
            SectionName::CommercialTerms.defaults()
        );
        assert_eq!(form.payment_terms, SectionName::PaymentTerms.defaults());
    }

    #[test]
    fn test_find_field_searches_every_section() {
        let spec = SectionName::find_field("rcAgUsdPerToz").unwrap();
        assert_eq!(spec.kind, FieldKind::Number);
        assert_eq!(
            SectionName::find_field("surveyor").map(|spec| spec.kind),
            Some(FieldKind::Choice(DropdownList::Surveyors))
        );
        assert!(SectionName::find_field("assayData").is_none());
    }

    #[test]
    fn test_section_name_from_str() {
        assert_eq!(
            "commercialTerms".parse::<SectionName>().unwrap(),
            SectionName::CommercialTerms
        );
        let err = "shipping".parse::<SectionName>().unwrap_err();
        assert!(matches!(err, WizardError::UnknownSection(name) if name == "shipping"));
    }

    #[test]
    fn test_section_name_serde_matches_as_str() {
        for section in SectionName::ALL {
            let json = serde_json::to_string(&section).unwrap();
            assert_eq!(json, format!("\"{}\"", section.as_str()));
        }
    }
}
