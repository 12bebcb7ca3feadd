use serde::Deserialize;

use crate::error::DeckError;
use crate::sql::filter::{SelectSpec, build_select};
use crate::sql::quote::Ident;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateViewPayload {
    pub view_name: String,
    pub select: SelectSpec,
    #[serde(default)]
    pub with_check_option: bool,
}

/// `CREATE OR REPLACE VIEW "v" AS SELECT ... [WITH CHECK OPTION]`
pub fn build_create_view(table: &str, payload: &CreateViewPayload) -> Result<String, DeckError> {
    let view = Ident::new("view", &payload.view_name)?;
    let select = build_select(table, &payload.select)?;
    let mut query = format!("CREATE OR REPLACE VIEW {view} AS {select}");
    if payload.with_check_option {
        query.push_str(" WITH CHECK OPTION");
    }
    Ok(query)
}

/// `SELECT * FROM "v" [LIMIT n] [OFFSET n]`
pub fn build_view_select(
    view: &str,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<String, DeckError> {
    let view = Ident::new("view", view)?;
    let mut query = format!("SELECT * FROM {view}");
    if let Some(limit) = limit {
        if limit <= 0 {
            return Err(DeckError::InvalidLimit);
        }
        query.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = offset {
        if offset < 0 {
            return Err(DeckError::InvalidOffset);
        }
        query.push_str(&format!(" OFFSET {offset}"));
    }
    Ok(query)
}

/// `DROP VIEW "v"`
pub fn build_drop_view(view: &str) -> Result<String, DeckError> {
    let view = Ident::new("view", view)?;
    Ok(format!("DROP VIEW {view}"))
}
