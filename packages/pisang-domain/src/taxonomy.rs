use crate::{Error, Result};

pub const NON_TARGET_LABEL: &str = "non_banana";
pub const UNKNOWN_DISPLAY: &str = "N/A";
pub const UNKNOWN_MESSAGE: &str = "Tidak diketahui";

/// Classifier output order. The model was trained against exactly this ordering.
pub const CLASS_LABELS: [&str; 16] = [
	"ambon_hampirbusuk",
	"ambon_matang",
	"ambon_mentah",
	"ambon_setengahmatang",
	"ambon_terlalumatang",
	"kepok_hampirbusuk",
	"kepok_matang",
	"kepok_mentah",
	"kepok_setengahmatang",
	"kepok_terlalumatang",
	NON_TARGET_LABEL,
	"susu_hampirbusuk",
	"susu_matang",
	"susu_mentah",
	"susu_setengahmatang",
	"susu_terlalumatang",
];

const LABEL_SEPARATOR: char = '_';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variety {
	Ambon,
	Kepok,
	Susu,
}
impl Variety {
	pub const ALL: [Self; 3] = [Self::Ambon, Self::Kepok, Self::Susu];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Ambon => "ambon",
			Self::Kepok => "kepok",
			Self::Susu => "susu",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|variety| variety.as_str() == raw)
	}
}

/// Ripeness stages in ripening order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
	Mentah,
	SetengahMatang,
	Matang,
	TerlaluMatang,
	HampirBusuk,
}
impl Stage {
	pub const ALL: [Self; 5] =
		[Self::Mentah, Self::SetengahMatang, Self::Matang, Self::TerlaluMatang, Self::HampirBusuk];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Mentah => "mentah",
			Self::SetengahMatang => "setengahmatang",
			Self::Matang => "matang",
			Self::TerlaluMatang => "terlalumatang",
			Self::HampirBusuk => "hampirbusuk",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|stage| stage.as_str() == raw)
	}

	pub fn range(self) -> StageRange {
		match self {
			Self::Mentah => StageRange::half_open(0.0, 20.0),
			Self::SetengahMatang => StageRange::half_open(20.0, 40.0),
			Self::Matang => StageRange::half_open(40.0, 60.0),
			Self::TerlaluMatang => StageRange::half_open(60.0, 80.0),
			Self::HampirBusuk => StageRange::closed(80.0, 100.0),
		}
	}

	pub fn ripening(self) -> RipeningInfo {
		match self {
			Self::Mentah => RipeningInfo {
				days: Some(5),
				message: "Pisang masih mentah, perlu sekitar 5 hari untuk matang.",
			},
			Self::SetengahMatang => RipeningInfo {
				days: Some(3),
				message: "Pisang setengah matang, akan matang dalam 3 hari.",
			},
			Self::Matang =>
				RipeningInfo { days: Some(0), message: "Pisang sudah matang, siap dikonsumsi." },
			Self::TerlaluMatang => RipeningInfo {
				days: Some(-1),
				message: "Pisang terlalu matang, sebaiknya segera dikonsumsi.",
			},
			Self::HampirBusuk => RipeningInfo {
				days: Some(-3),
				message: "Pisang hampir busuk, tidak layak dikonsumsi.",
			},
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageRange {
	pub low: f64,
	pub high: f64,
	/// Whether `high` itself belongs to the band. Only the top band is closed.
	pub closed: bool,
}
impl StageRange {
	pub const FULL: Self = Self::half_open(0.0, 100.0);

	pub const fn half_open(low: f64, high: f64) -> Self {
		Self { low, high, closed: false }
	}

	pub const fn closed(low: f64, high: f64) -> Self {
		Self { low, high, closed: true }
	}

	pub fn contains(&self, value: f64) -> bool {
		if self.closed {
			(self.low..=self.high).contains(&value)
		} else {
			(self.low..self.high).contains(&value)
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RipeningInfo {
	/// Negative values mean the banana is already past its best.
	pub days: Option<i32>,
	pub message: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nutrition {
	pub glucose: &'static str,
	pub calories: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelParts<'a> {
	pub variety: &'a str,
	pub stage: &'a str,
}

pub fn decompose(label: &str) -> Result<LabelParts<'_>> {
	let mut parts = label.split(LABEL_SEPARATOR);

	match (parts.next(), parts.next(), parts.next()) {
		(Some(variety), Some(stage), None) if !variety.is_empty() && !stage.is_empty() =>
			Ok(LabelParts { variety, stage }),
		_ => Err(Error::MalformedLabel { label: label.to_string() }),
	}
}

pub fn range_for_stage(stage: &str) -> StageRange {
	Stage::parse(stage).map(Stage::range).unwrap_or(StageRange::FULL)
}

pub fn ripening_info(stage: &str) -> RipeningInfo {
	Stage::parse(stage)
		.map(Stage::ripening)
		.unwrap_or(RipeningInfo { days: None, message: UNKNOWN_MESSAGE })
}

pub fn nutrition(variety: &str, stage: &str) -> Nutrition {
	match (Variety::parse(variety), Stage::parse(stage)) {
		(Some(variety), Some(stage)) => nutrition_table(variety, stage),
		_ => Nutrition { glucose: UNKNOWN_DISPLAY, calories: UNKNOWN_DISPLAY },
	}
}

// Glucose in grams and calories in kcal, per 100 g of flesh.
fn nutrition_table(variety: Variety, stage: Stage) -> Nutrition {
	let (glucose, calories) = match (variety, stage) {
		(Variety::Susu, Stage::Mentah) => ("0.75 - 4.00", "4.8 - 25.6"),
		(Variety::Susu, Stage::SetengahMatang) => ("3.75 - 4.00", "24.0 - 25.6"),
		(Variety::Susu, Stage::Matang) => ("8.25 - 10.5", "52.8 - 67.2"),
		(Variety::Susu, Stage::TerlaluMatang) => ("9.00 - 10.5", "57.6 - 67.2"),
		(Variety::Susu, Stage::HampirBusuk) => ("11.5", "73.6"),
		(Variety::Kepok, Stage::Mentah) => ("1.25 - 4.00", "8.0 - 25.6"),
		(Variety::Kepok, Stage::SetengahMatang) => ("3.25 - 5.75", "20.8 - 36.8"),
		(Variety::Kepok, Stage::Matang) => ("5.50 - 11.25", "35.2 - 72.0"),
		(Variety::Kepok, Stage::TerlaluMatang) => ("9.50 - 11.50", "60.8 - 73.6"),
		(Variety::Kepok, Stage::HampirBusuk) => (" > 11.50", " > 73.6"),
		(Variety::Ambon, Stage::Mentah) => ("0.75 - 1.25", "4.8 - 8.0"),
		(Variety::Ambon, Stage::SetengahMatang) => ("6.00 - 7.00", "38.4 - 44.8"),
		(Variety::Ambon, Stage::Matang) => ("7.00 - 11.25", "44.8 - 72.0"),
		(Variety::Ambon, Stage::TerlaluMatang) => ("7.50 - 11.25", "48.0 - 72.0"),
		(Variety::Ambon, Stage::HampirBusuk) => (" > 11.25", " > 72.0"),
	};

	Nutrition { glucose, calories }
}
