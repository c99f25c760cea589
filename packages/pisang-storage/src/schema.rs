#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
	Records,
	Documents,
}
impl Schema {
	pub fn sql(self) -> &'static str {
		match self {
			Self::Records => include_str!("../../../sql/records.sql"),
			Self::Documents => include_str!("../../../sql/documents.sql"),
		}
	}

	pub(crate) fn lock_id(self) -> i64 {
		match self {
			Self::Records => 7_120_201,
			Self::Documents => 7_120_202,
		}
	}
}

pub fn statements(schema: Schema) -> impl Iterator<Item = &'static str> {
	schema.sql().split(';').map(str::trim).filter(|statement| !statement.is_empty())
}
