use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// One of the `Place` identifiers.
    pub place: String,
    #[sea_orm(indexed)]
    pub speciality_id: Option<Uuid>,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "speciality_id", to = "id", on_delete = "SetNull")]
    pub speciality: HasOne<super::speciality::Entity>,
    #[sea_orm(has_many)]
    pub users: HasMany<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

base_entity!("Group");

/// Physical locations a group can be placed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Place {
    ItCube,
    Cvantorium,
    ItCubeScopin,
    ItCubeSasovo,
}

impl Place {
    pub fn as_str(&self) -> &'static str {
        match self {
            Place::ItCube => "it-cube",
            Place::Cvantorium => "cvantorium",
            Place::ItCubeScopin => "it-cube-scopin",
            Place::ItCubeSasovo => "it-cube-sasovo",
        }
    }
}

impl TryFrom<&str> for Place {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "it-cube" => Ok(Place::ItCube),
            "cvantorium" => Ok(Place::Cvantorium),
            "it-cube-scopin" => Ok(Place::ItCubeScopin),
            "it-cube-sasovo" => Ok(Place::ItCubeSasovo),
            _ => Err(()),
        }
    }
}
