use serde::Serialize;

use crate::store::{Event, FamilyRecord, PersonRecord, Tree};

/// What a serializer needs besides the record itself: the tree (for resolving
/// spouse references and for the tree segment of canonical URLs) and the
/// deployment's public base URL.
pub struct DocumentContext<'a> {
    pub tree: &'a Tree,
    pub base_url: &'a str,
}

impl<'a> DocumentContext<'a> {
    fn record_url(&self, kind: &str, xref: &str) -> String {
        format!("{}/tree/{}/{}/{}", self.base_url, self.tree.name, kind, xref)
    }
}

/// One entity kind served by the API. Route handlers are generic over this,
/// so persons and families share a single dispatch pipeline and differ only
/// in which collection they walk and what document they emit.
pub trait EntityKind {
    type Record;
    type Document: Serialize;

    fn collection(tree: &Tree) -> &[Self::Record];
    fn document(ctx: &DocumentContext<'_>, record: &Self::Record) -> Self::Document;
}

/// Flat wire document for one individual. Optional fields serialize as
/// explicit nulls; a missing date or place never fails serialization.
#[derive(Debug, Serialize)]
pub struct PersonDocument {
    pub id: String,
    pub name: String,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub birth_place: Option<String>,
    pub death_place: Option<String>,
    pub sex: &'static str,
    pub url: String,
}

/// Spouse reference embedded in a family document.
#[derive(Debug, Serialize)]
pub struct PartnerDocument {
    pub id: String,
    pub name: String,
}

/// Flat wire document for one family union.
#[derive(Debug, Serialize)]
pub struct FamilyDocument {
    pub id: String,
    pub husband: Option<PartnerDocument>,
    pub wife: Option<PartnerDocument>,
    pub marriage_date: Option<String>,
    pub marriage_place: Option<String>,
    pub children_count: usize,
    pub url: String,
}

pub enum Persons {}

impl EntityKind for Persons {
    type Record = PersonRecord;
    type Document = PersonDocument;

    fn collection(tree: &Tree) -> &[PersonRecord] {
        &tree.individuals
    }

    fn document(ctx: &DocumentContext<'_>, person: &PersonRecord) -> PersonDocument {
        PersonDocument {
            id: person.xref.clone(),
            name: person.name.clone(),
            birth_date: event_date(&person.birth),
            death_date: event_date(&person.death),
            birth_place: event_place(&person.birth),
            death_place: event_place(&person.death),
            sex: person.sex.code(),
            url: ctx.record_url("individual", &person.xref),
        }
    }
}

pub enum Families {}

impl EntityKind for Families {
    type Record = FamilyRecord;
    type Document = FamilyDocument;

    fn collection(tree: &Tree) -> &[FamilyRecord] {
        &tree.families
    }

    fn document(ctx: &DocumentContext<'_>, family: &FamilyRecord) -> FamilyDocument {
        FamilyDocument {
            id: family.xref.clone(),
            husband: partner(ctx, family.husband.as_deref()),
            wife: partner(ctx, family.wife.as_deref()),
            marriage_date: event_date(&family.marriage),
            marriage_place: event_place(&family.marriage),
            children_count: family.children.len(),
            url: ctx.record_url("family", &family.xref),
        }
    }
}

// A date is emitted only when it resolves to a calendar date; a spouse only
// when the xref is present AND actually exists in the tree. Everything else
// degrades to null.

fn event_date(event: &Option<Event>) -> Option<String> {
    event
        .as_ref()
        .and_then(|e| e.date.as_ref())
        .and_then(|d| d.to_iso())
}

fn event_place(event: &Option<Event>) -> Option<String> {
    event.as_ref().and_then(|e| e.place.clone())
}

fn partner(ctx: &DocumentContext<'_>, xref: Option<&str>) -> Option<PartnerDocument> {
    let person = ctx.tree.person(xref?)?;
    Some(PartnerDocument {
        id: person.xref.clone(),
        name: person.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTreeStore;
    use crate::store::TreeStore;
    use std::sync::Arc;

    const SAMPLE: &str = r#"{
        "trees": [{
            "id": 1,
            "name": "demo",
            "individuals": [
                {"xref": "I1", "name": "Pierre Dupont", "sex": "M",
                 "birth": {"date": "12 JAN 1900", "place": "Lyon, France"},
                 "death": {"date": "ABT 1970"}},
                {"xref": "I2", "name": "Marie Curie", "sex": "F",
                 "birth": {"date": "sometime"}}
            ],
            "families": [
                {"xref": "F1", "husband": "I1", "wife": "I2",
                 "marriage": {"date": "1925", "place": "Paris, France"},
                 "children": ["I3", "I4", "I5"]},
                {"xref": "F2", "wife": "I2"},
                {"xref": "F3", "husband": "I99"}
            ]
        }]
    }"#;

    async fn demo_tree() -> Arc<Tree> {
        let store = MemoryTreeStore::from_json(SAMPLE).unwrap();
        store.find_tree(1).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_person_document_fields() {
        let tree = demo_tree().await;
        let ctx = DocumentContext {
            tree: &tree,
            base_url: "https://trees.example.com",
        };

        let doc = Persons::document(&ctx, &tree.individuals[0]);
        assert_eq!(doc.id, "I1");
        assert_eq!(doc.name, "Pierre Dupont");
        assert_eq!(doc.birth_date.as_deref(), Some("1900-01-12"));
        assert_eq!(doc.death_date.as_deref(), Some("1970-01-01"));
        assert_eq!(doc.birth_place.as_deref(), Some("Lyon, France"));
        assert_eq!(doc.death_place, None);
        assert_eq!(doc.sex, "M");
        assert_eq!(doc.url, "https://trees.example.com/tree/demo/individual/I1");
    }

    #[tokio::test]
    async fn test_unresolvable_date_becomes_null_not_error() {
        let tree = demo_tree().await;
        let ctx = DocumentContext {
            tree: &tree,
            base_url: "http://localhost:3000",
        };

        let doc = Persons::document(&ctx, &tree.individuals[1]);
        assert_eq!(doc.birth_date, None);
        assert_eq!(doc.death_date, None);
        assert_eq!(doc.death_place, None);
    }

    #[tokio::test]
    async fn test_family_document_fields() {
        let tree = demo_tree().await;
        let ctx = DocumentContext {
            tree: &tree,
            base_url: "http://localhost:3000",
        };

        let doc = Families::document(&ctx, &tree.families[0]);
        assert_eq!(doc.id, "F1");
        assert_eq!(doc.husband.as_ref().unwrap().id, "I1");
        assert_eq!(doc.husband.as_ref().unwrap().name, "Pierre Dupont");
        assert_eq!(doc.wife.as_ref().unwrap().id, "I2");
        assert_eq!(doc.marriage_date.as_deref(), Some("1925-01-01"));
        assert_eq!(doc.marriage_place.as_deref(), Some("Paris, France"));
        assert_eq!(doc.children_count, 3);
        assert_eq!(doc.url, "http://localhost:3000/tree/demo/family/F1");
    }

    #[tokio::test]
    async fn test_missing_husband_is_null_and_still_serialized() {
        let tree = demo_tree().await;
        let ctx = DocumentContext {
            tree: &tree,
            base_url: "http://localhost:3000",
        };

        let doc = Families::document(&ctx, &tree.families[1]);
        assert!(doc.husband.is_none());
        assert_eq!(doc.children_count, 0);

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("husband").is_some(), "husband key must be present");
        assert!(json["husband"].is_null());
    }

    #[tokio::test]
    async fn test_dangling_spouse_xref_degrades_to_null() {
        let tree = demo_tree().await;
        let ctx = DocumentContext {
            tree: &tree,
            base_url: "http://localhost:3000",
        };

        let doc = Families::document(&ctx, &tree.families[2]);
        assert!(doc.husband.is_none());
        assert!(doc.wife.is_none());
    }
}
