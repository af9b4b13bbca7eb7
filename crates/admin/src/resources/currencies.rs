//! Currencies and their exchange rates against the base currency.
//!
//! The list is small, so it is loaded whole and filtered, sorted and
//! paginated in memory.

use std::str::FromStr;

use freightdesk_core::table::{ProcessingMode, TableRow};
use freightdesk_core::{CurrencyId, FieldErrors};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::components::form::value;
use crate::components::{
    BulkAction, DataTableConfig, FieldKind, FilterOption, FormField, FormValues, TableColumn,
    TableFilter,
};
use crate::crud_documents;
use crate::graphql::documents::CrudDocuments;

const YES_NO: &[(&str, &str)] = &[("false", "No"), ("true", "Yes")];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: CurrencyId,
    /// ISO 4217 code.
    pub code: String,
    pub name: String,
    pub symbol: String,
    /// Units of this currency per unit of the base currency.
    pub exchange_rate: Decimal,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInput {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: Decimal,
    pub is_default: bool,
}

impl TableRow for Currency {
    fn row_id(&self) -> String {
        self.id.to_string()
    }

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "code" => Some(self.code.clone()),
            "name" => Some(self.name.clone()),
            "symbol" => Some(self.symbol.clone()),
            "exchange_rate" => Some(self.exchange_rate.normalize().to_string()),
            "is_default" => Some(if self.is_default { "Yes" } else { "No" }.to_string()),
            _ => None,
        }
    }
}

impl Resource for Currency {
    type Input = CurrencyInput;

    const SINGULAR: &'static str = "currency";
    const PLURAL: &'static str = "currencies";
    const LABEL: &'static str = "Currency";
    const TITLE: &'static str = "Currencies";
    const MODE: ProcessingMode = ProcessingMode::Client;
    const DOCUMENTS: CrudDocuments = crud_documents! {
        all {
            list: "currencies",
            single: "currency",
            create: "createCurrency",
            update: "updateCurrency",
            delete: "deleteCurrency",
            bulk_delete: "deleteCurrencies",
            input: "CurrencyInput",
            fields: "id code name symbol exchangeRate isDefault",
        }
    };
    const FORM: &'static [FormField] = &[
        FormField::text("code", "Code").required().placeholder("EUR"),
        FormField::text("name", "Name").required().placeholder("Euro"),
        FormField::text("symbol", "Symbol").required().placeholder("€"),
        FormField::text("exchange_rate", "Exchange rate")
            .kind(FieldKind::Number)
            .required()
            .placeholder("1.0000"),
        FormField::text("is_default", "Default currency").kind(FieldKind::Select(YES_NO)),
    ];
    const SEARCHABLE: &'static [&'static str] = &["code", "name", "symbol"];

    fn table() -> DataTableConfig {
        DataTableConfig::new("currencies")
            .column(TableColumn::sortable("code", "Code"))
            .column(TableColumn::sortable("name", "Name"))
            .column(TableColumn::new("symbol", "Symbol"))
            .column(TableColumn::sortable("exchange_rate", "Exchange rate"))
            .column(TableColumn::new("is_default", "Default"))
            .filter(TableFilter::select(
                "is_default",
                "Default",
                YES_NO
                    .iter()
                    .rev()
                    .map(|&(_, label)| FilterOption::new(label, label))
                    .collect(),
            ))
            .bulk_action(BulkAction::new("bulk-delete", "Delete selected", "ph-trash").destructive())
            .search_placeholder("Search currencies by code or name...")
            .empty_state("ph-currency-circle-dollar", "No currencies found", None)
    }

    fn form_values(&self) -> FormValues {
        FormValues::from([
            ("code".to_string(), self.code.clone()),
            ("name".to_string(), self.name.clone()),
            ("symbol".to_string(), self.symbol.clone()),
            (
                "exchange_rate".to_string(),
                self.exchange_rate.normalize().to_string(),
            ),
            ("is_default".to_string(), self.is_default.to_string()),
        ])
    }

    fn validate(values: &FormValues) -> Result<CurrencyInput, FieldErrors> {
        let code = value(values, "code").to_ascii_uppercase();
        let name = value(values, "name");
        let symbol = value(values, "symbol");
        let rate = value(values, "exchange_rate");
        let is_default = value(values, "is_default");

        let mut errors = FieldErrors::new();
        errors
            .required("code", "code", &code)
            .exact_length("code", "code", &code, 3)
            .required("name", "name", name)
            .max_length("name", "name", name, 100)
            .required("symbol", "symbol", symbol)
            .max_length("symbol", "symbol", symbol, 5)
            .required("exchange_rate", "exchange rate", rate)
            .one_of("is_default", "default flag", is_default, &["true", "false"]);

        let exchange_rate = if rate.is_empty() {
            None
        } else {
            match Decimal::from_str(rate) {
                Ok(rate) if rate > Decimal::ZERO => Some(rate),
                Ok(_) => {
                    errors.add("exchange_rate", "The exchange rate must be greater than 0.");
                    None
                }
                Err(_) => {
                    errors.add("exchange_rate", "The exchange rate must be a number.");
                    None
                }
            }
        };
        if !code.is_empty() && !code.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.add("code", "The code may only contain letters.");
        }
        errors.into_result()?;

        Ok(CurrencyInput {
            code,
            name: name.to_string(),
            symbol: symbol.to_string(),
            exchange_rate: exchange_rate.unwrap_or(Decimal::ONE),
            is_default: is_default == "true",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freightdesk_core::table::{ColumnFilter, Pagination, SortColumn, TableModel, TableUrlState};

    use super::*;

    fn currency(id: &str, code: &str, name: &str, rate: &str) -> Currency {
        Currency {
            id: CurrencyId::new(id),
            code: code.to_string(),
            name: name.to_string(),
            symbol: String::new(),
            exchange_rate: Decimal::from_str(rate).unwrap(),
            is_default: code == "EUR",
        }
    }

    fn state(search: &str, sorting: Vec<SortColumn>, filters: Vec<ColumnFilter>) -> TableUrlState {
        TableUrlState {
            pagination: Pagination {
                page_index: 0,
                page_size: 10,
            },
            global_filter: search.to_string(),
            column_filters: filters,
            sorting,
        }
    }

    fn rows() -> Vec<Currency> {
        vec![
            currency("1", "EUR", "Euro", "1"),
            currency("2", "USD", "US Dollar", "1.08"),
            currency("3", "GBP", "Pound Sterling", "0.85"),
            currency("4", "JPY", "Japanese Yen", "162.5"),
        ]
    }

    #[test]
    fn test_deserializes_backend_shape() {
        let currency: Currency = serde_json::from_value(serde_json::json!({
            "id": "2",
            "code": "USD",
            "name": "US Dollar",
            "symbol": "$",
            "exchangeRate": "1.0800",
            "isDefault": false
        }))
        .unwrap();
        assert_eq!(currency.cell("exchange_rate").as_deref(), Some("1.08"));
    }

    #[test]
    fn test_client_mode_sorts_rates_numerically() {
        let model = TableModel::client(
            rows(),
            &state("", vec![SortColumn::asc("exchange_rate")], vec![]),
            Currency::SEARCHABLE,
        );
        let codes: Vec<&str> = model.rows().iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["GBP", "EUR", "USD", "JPY"]);
    }

    #[test]
    fn test_client_mode_search_and_filter() {
        let model = TableModel::client(rows(), &state("dollar", vec![], vec![]), Currency::SEARCHABLE);
        assert_eq!(model.total(), 1);

        let model = TableModel::client(
            rows(),
            &state("", vec![], vec![ColumnFilter::new("is_default", &["Yes"])]),
            Currency::SEARCHABLE,
        );
        assert_eq!(model.rows()[0].code, "EUR");
        assert_eq!(model.total(), 1);
    }

    #[test]
    fn test_validate_exchange_rate() {
        let mut values = FormValues::from([
            ("code".to_string(), "usd".to_string()),
            ("name".to_string(), "US Dollar".to_string()),
            ("symbol".to_string(), "$".to_string()),
            ("exchange_rate".to_string(), "1.08".to_string()),
            ("is_default".to_string(), "false".to_string()),
        ]);
        let input = Currency::validate(&values).unwrap();
        assert_eq!(input.code, "USD");
        assert_eq!(input.exchange_rate, Decimal::from_str("1.08").unwrap());

        values.insert("exchange_rate".to_string(), "-2".to_string());
        let errors = Currency::validate(&values).unwrap_err();
        assert_eq!(
            errors.first("exchange_rate"),
            Some("The exchange rate must be greater than 0.")
        );

        values.insert("exchange_rate".to_string(), "abc".to_string());
        values.insert("code".to_string(), "US".to_string());
        let errors = Currency::validate(&values).unwrap_err();
        assert_eq!(errors.first("exchange_rate"), Some("The exchange rate must be a number."));
        assert_eq!(errors.first("code"), Some("The code must be 3 characters."));
    }

    #[test]
    fn test_input_serializes_camel_case() {
        let input = CurrencyInput {
            code: "EUR".to_string(),
            name: "Euro".to_string(),
            symbol: "€".to_string(),
            exchange_rate: Decimal::ONE,
            is_default: true,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["exchangeRate"], "1");
        assert_eq!(json["isDefault"], true);
    }
}
