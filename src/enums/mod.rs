//! Closed classifications used throughout the model: demographic
//! classes, bond/act kinds, and the fixed accessors that replace
//! TITAN's dynamic attribute lookups (spec §9).

mod act_kind;
mod assortable_attribute;
mod bond_type;
mod drug_type;
mod prep_targeting_model;
mod prep_type;
mod race;
mod sex_role;
mod sex_type;

pub use act_kind::ActKind;
pub use assortable_attribute::{AssortableAttribute, OTHER_KEY};
pub use bond_type::{BondTypeDef, BondTypeName};
pub use drug_type::DrugType;
pub use prep_targeting_model::PrepTargetingModel;
pub use prep_type::PrepType;
pub use race::Race;
pub use sex_role::SexRole;
pub use sex_type::{SexType, SleepsWithTable};
