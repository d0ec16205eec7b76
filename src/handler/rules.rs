//! Static rule tables.
//!
//! Everything that depends on the wording or layout of the guide lives here
//! as data. The classifier and the handlers only interpret these tables.

use super::anchors::{Band, MatchMode, Query};
use crate::model::PageTemplate;

// ==================== Classifier ====================

/// One AND term of a classifier rule: at least one needle must be present.
#[derive(Debug, Clone, Copy)]
pub struct Clause {
    pub mode: MatchMode,
    pub any_of: &'static [&'static str],
}

impl Clause {
    const fn exact(any_of: &'static [&'static str]) -> Self {
        Self {
            mode: MatchMode::Exact,
            any_of,
        }
    }

    const fn span_contains(any_of: &'static [&'static str]) -> Self {
        Self {
            mode: MatchMode::Contains,
            any_of,
        }
    }

    const fn page_text(any_of: &'static [&'static str]) -> Self {
        Self {
            mode: MatchMode::PageText,
            any_of,
        }
    }

    const fn chapter_heading() -> Self {
        Self {
            mode: MatchMode::ChapterHeading,
            any_of: &[""],
        }
    }
}

/// A template is chosen when every clause of one of its rules holds.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRule {
    pub template: PageTemplate,
    pub all_of: &'static [Clause],
}

/// Header texts that describe how or what happened in a beat.
const HOW_HEADERS: &[&str] = &[
    "HOW IT'S",
    "HOW IT'S EXECUTED",
    "HOW IT'S DONE",
    "HOW IT HAPPENS",
    "HOW IT PLAYS OUT",
    "WHAT HAPPENED",
    "WHAT HAPPENS",
];

/// Known prompt fragments of the question pages.
const PROMPT_FRAGMENTS: &[&str] = &[
    "Swoon-Worthy Lines",
    "What do I expect from this book",
    "What craft element do I want to study",
    "Final Verdict",
    "What would I steal",
    "What would I do differently",
];

/// Classifier rules in priority order; the first template whose rule holds wins.
pub static TEMPLATE_RULES: &[TemplateRule] = &[
    TemplateRule {
        template: PageTemplate::ChapterLog,
        all_of: &[
            Clause::chapter_heading(),
            Clause::span_contains(&["Arc Driver:"]),
        ],
    },
    TemplateRule {
        template: PageTemplate::BookMetadata,
        all_of: &[Clause::exact(&["Book Metadata"]), Clause::exact(&["Title:"])],
    },
    TemplateRule {
        template: PageTemplate::WriteQuestions,
        all_of: &[Clause::exact(&["Expectations & Goals"])],
    },
    TemplateRule {
        template: PageTemplate::WriteQuestions,
        all_of: &[Clause::page_text(PROMPT_FRAGMENTS)],
    },
    TemplateRule {
        template: PageTemplate::Table,
        all_of: &[
            Clause::exact(&["BEAT"]),
            Clause::exact(&["CHAPTER/PAGE", "CH/PAGE"]),
            Clause::exact(HOW_HEADERS),
        ],
    },
    TemplateRule {
        template: PageTemplate::Table,
        all_of: &[Clause::exact(&["FANTASY BEAT"]), Clause::exact(&["ROMANCE BEAT"])],
    },
    TemplateRule {
        template: PageTemplate::Table,
        all_of: &[Clause::exact(&["TROPE"]), Clause::exact(&["PRESENT?"])],
    },
    TemplateRule {
        template: PageTemplate::Table,
        all_of: &[
            Clause::exact(&["PATTERN"]),
            Clause::exact(&["FOUND?", "FOUND IN BOOK?"]),
        ],
    },
    TemplateRule {
        template: PageTemplate::Table,
        all_of: &[Clause::exact(&["SCENE"]), Clause::exact(&["HEAT LEVEL"])],
    },
    TemplateRule {
        template: PageTemplate::Table,
        all_of: &[
            Clause::exact(&["CRAFT MOVE"]),
            Clause::exact(&["WHERE", "CHAPTER/PAGE", "CH/PAGE"]),
        ],
    },
    TemplateRule {
        template: PageTemplate::ReferenceOnly,
        all_of: &[Clause::exact(&["PATTERN"]), Clause::exact(&["HOW IT WORKS"])],
    },
];

// ==================== Shared ====================

/// A label that becomes a single-line field named `field`.
#[derive(Debug, Clone, Copy)]
pub struct LabelField {
    pub label: Query,
    pub field: &'static str,
}

/// An option label that becomes a checkbox named `<prefix>_<slug>`.
#[derive(Debug, Clone, Copy)]
pub struct CheckOption {
    pub label: &'static str,
    pub slug: &'static str,
}

/// Horizontal position of a group on a two-column page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSide {
    Any,
    Left,
    Right,
}

/// A group of checkbox options searched inside one band.
#[derive(Debug, Clone, Copy)]
pub struct CheckGroup {
    pub prefix: &'static str,
    pub band: Band,
    pub side: ColumnSide,
    pub mode: MatchMode,
    pub options: &'static [CheckOption],
}

/// Edge length of a checkbox placed beside a label.
pub const CHECKBOX_SIZE: f32 = 10.0;

// ==================== Chapter log ====================

/// Header labels in the chapter log's header band.
pub static CHAPTER_HEADER_FIELDS: &[LabelField] = &[
    LabelField {
        label: Query::exact("Pages:"),
        field: "pages",
    },
    LabelField {
        label: Query::exact("POV:"),
        field: "pov",
    },
    LabelField {
        label: Query::exact("Location:"),
        field: "location",
    },
];

/// Vertical band holding the chapter log's header labels.
pub const CHAPTER_HEADER_BAND: Band = Band::Fixed(40.0, 110.0);

/// Category checkbox groups of the chapter log.
pub static CHAPTER_CHECK_GROUPS: &[CheckGroup] = &[
    CheckGroup {
        prefix: "arc",
        band: Band::After {
            anchor: Query::contains("Arc Driver:"),
            depth: 24.0,
        },
        side: ColumnSide::Any,
        mode: MatchMode::Exact,
        options: &[
            CheckOption {
                label: "Fantasy",
                slug: "fantasy",
            },
            CheckOption {
                label: "Romance",
                slug: "romance",
            },
            CheckOption {
                label: "Both Intertwined",
                slug: "both",
            },
        ],
    },
    CheckGroup {
        prefix: "tsrc",
        band: Band::After {
            anchor: Query::contains("Tension Source:"),
            depth: 24.0,
        },
        side: ColumnSide::Any,
        mode: MatchMode::Exact,
        options: &[
            CheckOption {
                label: "Danger",
                slug: "danger",
            },
            CheckOption {
                label: "Will-They/Won't-They",
                slug: "will_they",
            },
            CheckOption {
                label: "Mystery",
                slug: "mystery",
            },
            CheckOption {
                label: "Emotional Intimacy",
                slug: "intimacy",
            },
        ],
    },
    CheckGroup {
        prefix: "beat",
        band: Band::After {
            anchor: Query::prefix("Beat Types"),
            depth: 80.0,
        },
        side: ColumnSide::Right,
        mode: MatchMode::Exact,
        options: &[
            CheckOption {
                label: "Plot",
                slug: "plot",
            },
            CheckOption {
                label: "Romance",
                slug: "romance",
            },
            CheckOption {
                label: "World",
                slug: "world",
            },
            CheckOption {
                label: "Character",
                slug: "character",
            },
            CheckOption {
                label: "Action",
                slug: "action",
            },
            CheckOption {
                label: "Quiet",
                slug: "quiet",
            },
        ],
    },
];

/// Two rows of 1-10 tension digits split by a vertical cutoff.
#[derive(Debug, Clone, Copy)]
pub struct TensionScale {
    pub band: Band,
    /// Digits starting above this y belong to `upper_row`
    pub cutoff: f32,
    pub upper_row: &'static str,
    pub lower_row: &'static str,
    /// Digits drawn at this size or larger are not scale digits
    pub max_font: f32,
    pub checkbox_size: f32,
}

pub const CHAPTER_TENSION: TensionScale = TensionScale {
    band: Band::Fixed(130.0, 200.0),
    cutoff: 165.0,
    upper_row: "romance",
    lower_row: "plot",
    max_font: 9.0,
    checkbox_size: 12.0,
};

/// A write space bounded by two anchors in one column.
#[derive(Debug, Clone, Copy)]
pub struct WriteSpace {
    pub name: &'static str,
    pub top: Query,
    /// `None` runs the space down to the page-bottom bound
    pub bottom: Option<Query>,
    pub side: ColumnSide,
}

/// Chapter log write spaces; each column carries its own anchor chain.
pub static CHAPTER_WRITE_SPACES: &[WriteSpace] = &[
    WriteSpace {
        name: "job",
        top: Query::prefix("This chapter"),
        bottom: Some(Query::prefix("One-Sentence Summary")),
        side: ColumnSide::Left,
    },
    WriteSpace {
        name: "summary",
        top: Query::prefix("One-Sentence Summary"),
        bottom: Some(Query::prefix("Romance Shift")),
        side: ColumnSide::Left,
    },
    WriteSpace {
        name: "romance_shift",
        top: Query::prefix("Romance Shift"),
        bottom: Some(Query::prefix("Plot/World")),
        side: ColumnSide::Left,
    },
    WriteSpace {
        name: "plot_world",
        top: Query::prefix("Plot/World"),
        bottom: None,
        side: ColumnSide::Left,
    },
    WriteSpace {
        name: "opening_hook",
        top: Query::prefix("Opening Hook"),
        bottom: Some(Query::prefix("Closing Hook")),
        side: ColumnSide::Right,
    },
    WriteSpace {
        name: "closing_hook",
        top: Query::prefix("Closing Hook"),
        bottom: Some(Query::prefix("Beat Types")),
        side: ColumnSide::Right,
    },
    WriteSpace {
        name: "craft_move",
        top: Query::prefix("Craft Move"),
        bottom: None,
        side: ColumnSide::Right,
    },
];

/// Write spaces shorter than this are dropped.
pub const MIN_WRITE_SPACE_HEIGHT: f32 = 20.0;

/// Gap between the two columns of a chapter log.
pub const COLUMN_GUTTER: f32 = 16.0;

// ==================== Book metadata ====================

/// Labels of the metadata form. Field names are slugs of the label text.
pub static METADATA_LABELS: &[&str] = &[
    "Title:",
    "Author:",
    "Series & Book #:",
    "Publication Year:",
    "Page Count:",
    "Subgenre:",
];

/// Heat level digits, matched exactly below the heat level heading.
pub const HEAT_GROUP: CheckGroup = CheckGroup {
    prefix: "heat",
    band: Band::After {
        anchor: Query::contains("Heat Level"),
        depth: 40.0,
    },
    side: ColumnSide::Any,
    mode: MatchMode::Exact,
    options: &[
        CheckOption { label: "0", slug: "0" },
        CheckOption { label: "1", slug: "1" },
        CheckOption { label: "2", slug: "2" },
        CheckOption { label: "3", slug: "3" },
        CheckOption { label: "4", slug: "4" },
        CheckOption { label: "5", slug: "5" },
    ],
};

/// Anticipated tropes, matched by substring inside the trope section.
pub const TROPE_GROUP: CheckGroup = CheckGroup {
    prefix: "trope",
    band: Band::Between {
        start: Query::contains("Anticipated Tropes"),
        end: Query::exact("Expectations & Goals"),
    },
    side: ColumnSide::Any,
    mode: MatchMode::Contains,
    options: &[
        CheckOption {
            label: "Enemies to Lovers",
            slug: "enemies_to_lovers",
        },
        CheckOption {
            label: "Forced Proximity",
            slug: "forced_proximity",
        },
        CheckOption {
            label: "Fated Mates",
            slug: "fated_mates",
        },
        CheckOption {
            label: "Slow Burn",
            slug: "slow_burn",
        },
        CheckOption {
            label: "Forbidden Love",
            slug: "forbidden_love",
        },
        CheckOption {
            label: "Grumpy/Sunshine",
            slug: "grumpy_sunshine",
        },
        CheckOption {
            label: "Morally Grey",
            slug: "morally_grey",
        },
        CheckOption {
            label: "Found Family",
            slug: "found_family",
        },
        CheckOption {
            label: "Only One Bed",
            slug: "only_one_bed",
        },
        CheckOption {
            label: "Fake Relationship",
            slug: "fake_relationship",
        },
        CheckOption {
            label: "Arranged Marriage",
            slug: "arranged_marriage",
        },
        CheckOption {
            label: "Hidden Identity",
            slug: "hidden_identity",
        },
        CheckOption {
            label: "Touch Her and Die",
            slug: "touch_her_and_die",
        },
        CheckOption {
            label: "Falls First",
            slug: "falls_first",
        },
        CheckOption {
            label: "Possessive/Protective",
            slug: "possessive_protective",
        },
        CheckOption {
            label: "Villain Gets the Girl",
            slug: "villain_gets_girl",
        },
        CheckOption {
            label: "Who Did This",
            slug: "who_did_this",
        },
        CheckOption {
            label: "Redemption Arc",
            slug: "redemption_arc",
        },
    ],
};

// ==================== Write questions ====================

/// Fragments that mark a span as a question even without `?`.
pub static QUESTION_KEYWORDS: &[&str] = &[
    "Swoon-Worthy Lines",
    "Final Verdict",
    "Favorite",
    "Takeaway",
    "Notes",
];

/// Interrogative and lead-in prefixes of question spans.
pub static QUESTION_PREFIXES: &[&str] = &[
    "What", "How", "Why", "Which", "Where", "When", "Who", "Did", "Does", "Do ", "Is ", "Was",
    "Would", "Could", "List", "Describe", "Name", "Rate",
];

/// Minimum font size of a question span.
pub const QUESTION_MIN_FONT: f32 = 12.0;

/// Answer areas shorter than this are dropped.
pub const MIN_ANSWER_GAP: f32 = 30.0;

// ==================== Tables ====================

/// Tuning of the generic table detector.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Header spans must be drawn below this size
    pub header_max_font: f32,
    /// Spans within this distance of a row's first member join the row
    pub header_row_tolerance: f32,
    /// Headers whose left edges are this close are one wrapped header
    pub header_merge_tolerance: f32,
    /// Space kept between a column and the next header
    pub column_gutter: f32,
    /// Row label spans must be at least this size
    pub row_label_min_font: f32,
    /// Row labels within this distance belong to one row
    pub row_tolerance: f32,
    /// Row label spans may start this far left of the first column
    pub row_label_slack: f32,
    /// Height of synthesized rows when no row labels exist
    pub placeholder_row_height: f32,
    /// Rows shorter than this are skipped
    pub min_row_height: f32,
    /// The last row never runs deeper than this
    pub max_last_row_height: f32,
    /// Spans at this size or larger occupy a cell
    pub occupied_min_font: f32,
    /// Cells are grown by this much before probing for text
    pub occupied_tolerance: f32,
    /// Headers containing any of these get checkbox cells
    pub checkbox_headers: &'static [&'static str],
    /// Edge length of checkbox cells
    pub checkbox_size: f32,
    /// Distance from the cell top to the checkbox top
    pub checkbox_offset: f32,
    /// Inset of text cells
    pub cell_inset: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_max_font: 10.0,
            header_row_tolerance: 18.0,
            header_merge_tolerance: 15.0,
            column_gutter: 4.0,
            row_label_min_font: 8.0,
            row_tolerance: 15.0,
            row_label_slack: 5.0,
            placeholder_row_height: 75.0,
            min_row_height: 15.0,
            max_last_row_height: 80.0,
            occupied_min_font: 9.0,
            occupied_tolerance: 2.0,
            checkbox_headers: &["PRESENT", "FOUND"],
            checkbox_size: 12.0,
            checkbox_offset: 4.0,
            cell_inset: 2.0,
        }
    }
}

// ==================== Drawn shapes ====================

/// Thresholds of the drawn-shape detector.
#[derive(Debug, Clone, Copy)]
pub struct ShapeConfig {
    /// Shapes thinner than this are ignored
    pub min_extent: f32,
    pub checkbox_min: f32,
    pub checkbox_max: f32,
    /// Width and height of a checkbox may differ by this much
    pub checkbox_aspect_slack: f32,
    pub text_min_width: f32,
    /// Boxes taller than this are multi-line
    pub single_line_max_height: f32,
    /// Spans at this size or larger mark a box as already filled
    pub occupied_min_font: f32,
    /// Boxes are grown by this much before probing for text
    pub occupied_tolerance: f32,
    /// Boxes reaching within this distance of all four edges frame the page
    pub page_edge_margin: f32,
    /// Text boxes must be shorter than this fraction of the page height
    pub text_max_height_ratio: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            min_extent: 2.0,
            checkbox_min: 6.0,
            checkbox_max: 20.0,
            checkbox_aspect_slack: 2.0,
            text_min_width: 40.0,
            single_line_max_height: 30.0,
            occupied_min_font: 9.0,
            occupied_tolerance: 2.0,
            page_edge_margin: 40.0,
            text_max_height_ratio: 0.4,
        }
    }
}
