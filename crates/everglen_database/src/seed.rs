//! Demo cast for a fresh store.

use everglen_core::{Character, CharacterProfile, NewRelationship, Relationship};
use everglen_error::EverglenResult;
use everglen_interface::PersistenceGateway;
use tracing::info;

/// Characters and relationship inserted by [`seed_demo_cast`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoCast {
    /// Max Supernova, the nerd
    pub nerd: Character,
    /// Cameron Bandage, the bully
    pub bully: Character,
    /// They are boyfriends
    pub relationship: Relationship,
}

/// Insert two demo characters and their relationship if no character exists yet.
///
/// Returns `None` when the store already has characters.
pub async fn seed_demo_cast(gateway: &dyn PersistenceGateway) -> EverglenResult<Option<DemoCast>> {
    if !gateway.list_characters().await?.is_empty() {
        info!("Character table not empty, skipping demo cast");
        return Ok(None);
    }

    let nerd = gateway
        .create_character(&CharacterProfile {
            name: "Max Supernova".into(),
            age: 24,
            gender: "male".into(),
            personality: "shy".into(),
            high_school_clique: Some("nerd".into()),
            cultural_background: Some("American".into()),
            native_languages: vec!["English".into(), "Polish".into()],
            current_job: Some("Everglen High Science Teacher".into()),
            outfit: None,
            additional_desc: None,
        })
        .await?;

    let bully = gateway
        .create_character(&CharacterProfile {
            name: "Cameron Bandage".into(),
            age: 25,
            gender: "male".into(),
            personality: "bold".into(),
            high_school_clique: Some("bully".into()),
            cultural_background: Some("American".into()),
            native_languages: vec!["English".into()],
            current_job: Some("Everglen High Boxing Coach".into()),
            outfit: None,
            additional_desc: Some(
                "always has a bandage on the forehead since his high school days due to \
                 terrible luck where he falls to the floor if that is removed"
                    .into(),
            ),
        })
        .await?;

    let relationship = gateway
        .create_relationship(&NewRelationship {
            subject: nerd.id,
            object: bully.id,
            relation: "boyfriends".to_string(),
        })
        .await?;

    info!(nerd = %nerd.id, bully = %bully.id, relationship = %relationship.id, "Seeded demo cast");
    Ok(Some(DemoCast {
        nerd,
        bully,
        relationship,
    }))
}
