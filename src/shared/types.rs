use serde::Serialize;

/// Navigation entry highlighted in the top bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nav {
    Sales,
    Products,
    Categories,
    Invoices,
}

/// Context for the standalone error page
#[derive(Debug, Serialize)]
pub struct ErrorPage {
    pub status: u16,
    pub message: String,
}

/// Context for the shared "are you sure?" page in front of every delete
#[derive(Debug, Serialize)]
pub struct ConfirmDeletePage {
    pub nav: Nav,
    pub title: String,
    pub message: String,
    pub action: String,
    pub cancel: String,
}

/// One `<option>` of a select box
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}
