// ABOUTME: Club commands for courtside-cli: create a club and add members
// ABOUTME: Club creation is an operator action and needs no acting member
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::Session;
use courtside::database::Database;
use courtside::errors::AppResult;
use courtside::services::club_admin;
use courtside_core::permissions::ClubRole;
use uuid::Uuid;

/// Create a club, plus its first administrator when given
pub async fn create(
    database: &Database,
    name: &str,
    subdomain: &str,
    admin_id: Option<Uuid>,
    admin_name: Option<&str>,
) -> AppResult<()> {
    let club = club_admin::create_club(database, name, subdomain).await?;
    println!("Created club '{}' ({})", club.name, club.subdomain);
    println!("   Club ID: {}", club.id);

    if let (Some(admin_id), Some(admin_name)) = (admin_id, admin_name) {
        let member =
            club_admin::add_member(database, club.id, admin_id, admin_name, ClubRole::Admin)
                .await?;
        println!(
            "   Administrator: {} ({})",
            member.display_name, member.user_id
        );
    }
    Ok(())
}

/// Add a member to the club named by --club
///
/// Membership changes need an administrator when the club already has one
/// acting; bootstrapping uses `club create --admin-id`.
pub async fn add_member(
    session: &Session<'_>,
    member_id: Uuid,
    name: &str,
    role: ClubRole,
) -> AppResult<()> {
    let actor = session.actor().await?;
    actor.require_admin("add club members")?;
    let member = club_admin::add_member(session.database, actor.club_id, member_id, name, role)
        .await?;
    println!(
        "Added {} as {} ({})",
        member.display_name,
        member.role.as_str(),
        member.user_id
    );
    Ok(())
}
