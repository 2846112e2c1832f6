//! # Heuristic Settings
//!
//! Thresholds and vocabularies driving header detection, column classification
//! and value normalization. Every threshold has a named default constant; the
//! [`Settings`] struct carries them explicitly into each pipeline call.
use serde::Deserialize;

/// Number of leading rows scanned for the header row.
pub const HEADER_SEARCH_ROWS: usize = 20;

/// Number of leading non-missing values sampled per column.
pub const SAMPLE_SIZE: usize = 30;

/// Fraction of sampled values that must look like dates.
pub const DATE_MATCH_RATIO: f64 = 0.5;

/// Fraction of sampled values that must parse as numbers.
pub const NUMERIC_MATCH_RATIO: f64 = 0.6;

/// Fraction of sampled raw texts carrying a currency indicator for a monetary column.
pub const MONETARY_HINT_RATIO: f64 = 0.1;

/// Maximum distinct values of a boolean column.
pub const BOOLEAN_MAX_DISTINCT: usize = 4;

/// Maximum distinct values under which a text column is always categorical.
pub const CATEGORICAL_MAX_DISTINCT: usize = 35;

/// Average sampled length (in characters) above which text is free-form.
pub const LONG_TEXT_LENGTH: f64 = 45.0;

const HEADER_KEYWORDS: &[&str] = &[
    "DATA", "DATE", "VALOR", "VALUE", "CLIENTE", "CLIENT", "CUSTOMER", "CODIGO", "CÓDIGO",
    "CODE", "PRODUTO", "PRODUCT", "DESCRIÇÃO", "DESCRICAO", "DESCRIPTION", "QTD", "QUANTIDADE",
    "QUANTITY", "PREÇO", "PRECO", "PRICE", "NOME", "NAME",
];

const BOOLEAN_TOKENS: &[&str] = &["SIM", "NÃO", "NAO", "YES", "NO", "TRUE", "FALSE", "0", "1"];

const MONETARY_NAME_TOKENS: &[&str] = &[
    "valor", "preço", "preco", "price", "value", "amount", "receita", "faturamento", "custo",
    "cost", "total",
];

const QUANTITY_NAME_TOKENS: &[&str] = &[
    "qtd", "qtde", "quant", "qty", "quantity", "volume", "unidades", "units",
];

const CURRENCY_INDICATORS: &[&str] = &["R$", "US$", "$", "€", "£", "BRL", "USD", "EUR"];

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Tunable heuristics for one pipeline invocation.
///
/// Deserializes from a partial JSON document; absent fields keep their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub header_search_rows: usize,
    pub sample_size: usize,
    pub date_match_ratio: f64,
    pub numeric_match_ratio: f64,
    pub monetary_hint_ratio: f64,
    pub boolean_max_distinct: usize,
    pub categorical_max_distinct: usize,
    pub long_text_length: f64,
    /// Upper-case words whose presence marks a header row
    pub header_keywords: Vec<String>,
    /// Upper-case tokens a boolean column may contain
    pub boolean_tokens: Vec<String>,
    /// Lower-case column name fragments marking monetary columns
    pub monetary_name_tokens: Vec<String>,
    /// Lower-case column name fragments marking quantity columns
    pub quantity_name_tokens: Vec<String>,
    /// Currency symbols and codes, stripped before numeric parsing
    pub currency_indicators: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            header_search_rows: HEADER_SEARCH_ROWS,
            sample_size: SAMPLE_SIZE,
            date_match_ratio: DATE_MATCH_RATIO,
            numeric_match_ratio: NUMERIC_MATCH_RATIO,
            monetary_hint_ratio: MONETARY_HINT_RATIO,
            boolean_max_distinct: BOOLEAN_MAX_DISTINCT,
            categorical_max_distinct: CATEGORICAL_MAX_DISTINCT,
            long_text_length: LONG_TEXT_LENGTH,
            header_keywords: to_owned_list(HEADER_KEYWORDS),
            boolean_tokens: to_owned_list(BOOLEAN_TOKENS),
            monetary_name_tokens: to_owned_list(MONETARY_NAME_TOKENS),
            quantity_name_tokens: to_owned_list(QUANTITY_NAME_TOKENS),
            currency_indicators: to_owned_list(CURRENCY_INDICATORS),
        }
    }
}

impl Settings {
    /// Parses settings from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Settings, serde_json::Error> {
        serde_json::from_str(json)
    }
}
