use schemagraph_core::CatalogColumn;

use super::queries::RawColumn;

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<CatalogColumn> {
    raw.into_iter()
        .map(|col| CatalogColumn {
            entity: col.table_name,
            name: col.column_name,
            declared_type: col.data_type,
            underlying_type: col.udt_name,
        })
        .collect()
}
