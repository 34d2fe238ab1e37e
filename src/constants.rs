pub const LIST_DELIMITER: char = ',';

pub const LIST_JOINER: &str = ", ";

pub const OTHER_PREFIX: &str = "Other: ";

pub const DATE_FORMAT: &str = "%Y/%m/%d";

pub mod tables {

    pub const SHOWS: &str = "shows";

    pub const TEAM: &str = "team";

    pub const STUDIOS: &str = "studios";

    pub const ROLES: &str = "roles";
}

pub mod columns {

    pub const SHOWS: &[&str] = &[
        "id",
        "title",
        "network",
        "studios",
        "genre",
        "subgenre",
        "episode_count",
        "source_type",
        "status",
        "order_type",
        "announcement_date",
        "notes",
        "key_creatives",
    ];

    pub const TEAM: &[&str] = &["show_id", "name", "roles", "order", "notes"];

    pub const DICTIONARY: &[&str] = &["canonical_name", "category", "aliases"];
}

pub mod limits {

    pub const MIN_SEARCH_QUERY_LEN: usize = 2;

    pub const MAX_SEARCH_RESULTS: usize = 50;
}

pub mod team {

    pub const EMPTY_SENTINEL: &str = "No team members announced";
}
