//! Reference lists used to seed empty dictionary tables.

use super::{CanonicalDictionary, DictionaryDomain, DictionaryEntry};

#[must_use]
pub fn studio_entries() -> Vec<DictionaryEntry> {
    vec![
        DictionaryEntry::new(
            "20th Television",
            &[
                "20th Century Fox TV",
                "20th Century Fox Television",
                "20th TV",
                "Twentieth Century Fox Television",
            ],
        ),
        DictionaryEntry::new("ABC Signature", &["ABC Studios", "ABC Signature Studios"]),
        DictionaryEntry::new(
            "Warner Bros. Television",
            &["WBTV", "Warner Bros TV", "Warner Brothers Television", "Warner Bros"],
        ),
        DictionaryEntry::new(
            "Universal Television",
            &["UTV", "Universal TV", "NBCUniversal Television"],
        ),
        DictionaryEntry::new(
            "Sony Pictures Television",
            &["SPT", "Sony TV", "Sony Pictures TV"],
        ),
        DictionaryEntry::new(
            "CBS Studios",
            &["CBS Television Studios", "CBS TV Studios"],
        ),
        DictionaryEntry::new(
            "Paramount Television Studios",
            &["Paramount TV", "Paramount Television"],
        ),
        DictionaryEntry::new("Lionsgate Television", &["Lionsgate TV", "Lionsgate"]),
        DictionaryEntry::new(
            "Amazon MGM Studios",
            &["Amazon Studios", "MGM Television", "Amazon MGM"],
        ),
        DictionaryEntry::new("Apple Studios", &["Apple TV Studios"]),
        DictionaryEntry::new("A24", &["A24 Films", "A24 Television"]),
        DictionaryEntry::new("Netflix Studios", &["Netflix Originals"]),
    ]
}

#[must_use]
pub fn role_entries() -> Vec<DictionaryEntry> {
    vec![
        DictionaryEntry::new("Creator", &["Created By", "Co-Creator"]).with_category("Creative"),
        DictionaryEntry::new("Showrunner", &["Show Runner"]).with_category("Creative"),
        DictionaryEntry::new("Writer", &["Screenwriter", "Scribe", "Written By"])
            .with_category("Creative"),
        DictionaryEntry::new("Director", &["Dir", "Directed By"]).with_category("Creative"),
        DictionaryEntry::new("Executive Producer", &["EP", "Exec Producer", "Executive Prod"])
            .with_category("Producing"),
        DictionaryEntry::new("Co-Executive Producer", &["Co-EP", "Co Executive Producer"])
            .with_category("Producing"),
        DictionaryEntry::new("Producer", &["Prod"]).with_category("Producing"),
        DictionaryEntry::new("Star", &["Cast", "Lead", "Actor", "Actress"])
            .with_category("Talent"),
        DictionaryEntry::new("Composer", &["Music", "Score"]).with_category("Crew"),
        DictionaryEntry::new("Cinematographer", &["DP", "DoP", "Director of Photography"])
            .with_category("Crew"),
        DictionaryEntry::new("Editor", &["Film Editor"]).with_category("Crew"),
        DictionaryEntry::new("Casting Director", &["Casting"]).with_category("Crew"),
    ]
}

#[must_use]
pub fn studios() -> CanonicalDictionary {
    CanonicalDictionary::new(DictionaryDomain::Studios, studio_entries())
        .unwrap_or_else(|_| CanonicalDictionary::empty(DictionaryDomain::Studios))
}

#[must_use]
pub fn roles() -> CanonicalDictionary {
    CanonicalDictionary::new(DictionaryDomain::Roles, role_entries())
        .unwrap_or_else(|_| CanonicalDictionary::empty(DictionaryDomain::Roles))
}
