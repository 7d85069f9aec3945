use serde::Serialize;

pub type FieldMapping = [(&'static str, &'static str)];

const EXPENSES_FIELD_MAPPING: [(&str, &str); 19] = [
    ("Fund@Code", "fund"),
    ("Fund@Long Name", "fund_name"),
    ("Department@Dept", "department"),
    ("Department@Long Name", "department_name"),
    ("Unit@Unit Code", "unit"),
    ("Unit@Long Name", "unit_name"),
    ("Object Code Category@Code", "object_category_code"),
    ("Object Code Category@Long Name", "object_category_name"),
    ("Object Code@Code", "object_code"),
    ("Object Code@Long Name", "object_name"),
    ("Object Code - Spending Plan@Code", "object_spend_plan_code"),
    ("Object Code - Spending Plan@Long Name", "object_spend_plan_name"),
    ("Budget YTD with Period Cutoff", "budget_ytd_with_period_cutoff"),
    (
        "Proposed Budget CYE Amount FY & BFY Prompted (Phase 6)",
        "proposed_budget_cye_amount",
    ),
    ("Expenses MTD with Period Cutoff", "expenses_mtd"),
    ("Expenses YTD with Period Cutoff", "expenses_ytd"),
    ("Encumbrance YTD with Period Cutoff", "encumbrance_ytd"),
    ("Unobligated", "unobligated"),
    ("% Obligated", "percent_obligated"),
];

const REVENUE_FIELD_MAPPING: [(&str, &str); 17] = [
    ("Fund@Code", "fund"),
    ("Fund@Long Name", "fund_name"),
    ("Department@Dept", "department"),
    ("Department@Long Name", "department_name"),
    ("Unit@Unit Code", "unit"),
    ("Unit@Long Name", "unit_name"),
    ("Revenue Source Category@Code", "revenue_source_category_code"),
    (
        "Revenue Source Category@Long Name",
        "revenue_source_category_name",
    ),
    ("Revenue Source@Code", "revenue_source_code"),
    ("Revenue Source@Long Name", "revenue_source_name"),
    ("Revenue Budget YTD with Period Cutoff", "revenue_budget_ytd"),
    (
        "Proposed Revenue Amount CYE Prompted FY & BFY (Phase 6)",
        "revenue_cye",
    ),
    ("Revenue MTD with Period Cutoff", "revenue_mtd"),
    ("Revenue YTD with Period Cutoff", "revenue_ytd"),
    ("Revenue ITD with Period Cutoff", "revenue_itd"),
    ("Unrecognized Amount", "unrecognized_amount"),
    ("% Unrecognized", "percent_unrecognized"),
];

const EXPENSES_NUMERIC_FIELDS: [&str; 7] = [
    "budget_ytd_with_period_cutoff",
    "proposed_budget_cye_amount",
    "expenses_mtd",
    "expenses_ytd",
    "encumbrance_ytd",
    "unobligated",
    "percent_obligated",
];

const REVENUE_NUMERIC_FIELDS: [&str; 7] = [
    "revenue_ytd",
    "revenue_budget_ytd",
    "revenue_cye",
    "revenue_mtd",
    "revenue_itd",
    "unrecognized_amount",
    "percent_unrecognized",
];

const EXPENSES_IDENTIFIER_COLUMNS: [&str; 6] = [
    "fiscal_year",
    "fiscal_month",
    "fund",
    "department",
    "unit",
    "object_code",
];

const REVENUE_IDENTIFIER_COLUMNS: [&str; 7] = [
    "fiscal_year",
    "fiscal_month",
    "fund",
    "department",
    "unit",
    "revenue_source_category_code",
    "revenue_source_code",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Expenses,
    Revenue,
}

impl ReportType {
    pub const ALL: [ReportType; 2] = [ReportType::Expenses, ReportType::Revenue];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expenses => "expenses",
            Self::Revenue => "revenue",
        }
    }

    pub fn from_dir(value: &str) -> Option<Self> {
        match value {
            "expenses" => Some(Self::Expenses),
            "revenue" => Some(Self::Revenue),
            _ => None,
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Expenses => "expenses/",
            Self::Revenue => "revenue/",
        }
    }

    pub fn field_mapping(self) -> &'static FieldMapping {
        match self {
            Self::Expenses => &EXPENSES_FIELD_MAPPING,
            Self::Revenue => &REVENUE_FIELD_MAPPING,
        }
    }

    pub fn numeric_fields(self) -> &'static [&'static str] {
        match self {
            Self::Expenses => &EXPENSES_NUMERIC_FIELDS,
            Self::Revenue => &REVENUE_NUMERIC_FIELDS,
        }
    }

    pub fn identifier_columns(self) -> &'static [&'static str] {
        match self {
            Self::Expenses => &EXPENSES_IDENTIFIER_COLUMNS,
            Self::Revenue => &REVENUE_IDENTIFIER_COLUMNS,
        }
    }
}
