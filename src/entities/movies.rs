use sea_orm::entity::prelude::*;
use serde::{Serialize, Serializer};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// ISO 8601 calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[sea_orm(column_type = "Double")]
    #[serde(serialize_with = "whole_score")]
    pub score: f64,
    pub genre: String,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    #[sea_orm(column_type = "Text")]
    pub crew: String,
    pub orig_title: String,
    pub status: String,
    pub orig_lang: String,
    pub budget: i64,
    pub revenue: i64,
    pub country: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Scores are whole numbers on a 0-100 scale in responses.
fn whole_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(score.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_serializes_as_integer() {
        let movie = Model {
            id: 1,
            name: "Creed III".to_string(),
            date: "2023-03-02".to_string(),
            score: 73.0,
            genre: "Drama,Action".to_string(),
            overview: String::new(),
            crew: String::new(),
            orig_title: "Creed III".to_string(),
            status: "Released".to_string(),
            orig_lang: "English".to_string(),
            budget: 75_000_000,
            revenue: 271_616_668,
            country: "AU".to_string(),
        };

        let json = serde_json::to_string(&movie).unwrap();
        assert!(json.contains(r#""score":73,"#), "{json}");

        let rounded = serde_json::to_value(Model { score: 72.6, ..movie }).unwrap();
        assert_eq!(rounded["score"], 73);
    }
}
