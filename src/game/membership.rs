//! Join-Request Workflow & Gang Membership
//!
//! A player asks to join a gang; a Lieutenant or God Father of that gang
//! approves or denies. The request lifecycle is none → requested →
//! (approved | none), with at most one outstanding request per
//! (player, gang) pair.
//!
//! Disband is member-gated but not role-gated: any member may pull the
//! trigger. Role restrictions on disband, if a deployment wants them, belong
//! to the dispatcher's command policy.

use log::{info, warn};

use crate::game::engine::GangWarsEngine;
use crate::game::errors::GangWarsError;
use crate::game::types::{GangRecord, JoinRequestRecord, Role};
use crate::logutil::escape_log;

impl GangWarsEngine {
    /// File a request to join a gang.
    pub fn request_join(
        &mut self,
        player_id: &str,
        gang_id: &str,
    ) -> Result<JoinRequestRecord, GangWarsError> {
        let player = self.store.get_player(player_id)?;
        if player.gang_id.is_some() {
            return Err(GangWarsError::AlreadyInGang);
        }
        let gang = self.store.get_gang(gang_id)?;
        if self.store.find_request(&player.id, &gang.id)?.is_some() {
            return Err(GangWarsError::DuplicateRequest);
        }

        let request = JoinRequestRecord::new(&player.id, &gang.id);
        self.store.put_request(request.clone())?;
        info!(
            "join request {} by {} for gang {}",
            request.id,
            escape_log(player_id),
            escape_log(&gang.name)
        );
        Ok(request)
    }

    /// Approve a join request. The approver must be a Lieutenant or God
    /// Father of the gang the request targets. Consumes the request.
    pub fn approve_join(
        &mut self,
        request_id: &str,
        approver_id: &str,
    ) -> Result<GangRecord, GangWarsError> {
        let request = self.store.get_request(request_id)?;
        let approver = self.store.get_player(approver_id)?;
        let is_gang_officer = approver.gang_id.as_deref() == Some(request.gang_id.as_str())
            && approver.role.is_officer();
        if !is_gang_officer {
            return Err(GangWarsError::PermissionDenied(
                "join approval requires a Lieutenant or God Father of the gang".to_string(),
            ));
        }

        let mut joiner = self.store.get_player(&request.player_id)?;
        if joiner.gang_id.is_some() {
            // Joined somewhere else while the request sat in the queue.
            self.store.delete_request(&request.id)?;
            return Err(GangWarsError::AlreadyInGang);
        }

        let mut gang = self.store.get_gang(&request.gang_id)?;
        joiner.gang_id = Some(gang.id.clone());
        joiner.role = Role::Grunt;
        gang.add_member(&joiner.id);

        self.store.put_player(joiner)?;
        self.store.put_gang(gang.clone())?;
        self.store.delete_request(&request.id)?;
        info!(
            "join request {} approved by {}",
            request.id,
            escape_log(approver_id)
        );
        Ok(gang)
    }

    /// Deny a join request. Same authority as approval; the request is
    /// deleted with no other side effects.
    pub fn deny_join(&mut self, request_id: &str, approver_id: &str) -> Result<(), GangWarsError> {
        let request = self.store.get_request(request_id)?;
        let approver = self.store.get_player(approver_id)?;
        let is_gang_officer = approver.gang_id.as_deref() == Some(request.gang_id.as_str())
            && approver.role.is_officer();
        if !is_gang_officer {
            return Err(GangWarsError::PermissionDenied(
                "join denial requires a Lieutenant or God Father of the gang".to_string(),
            ));
        }
        self.store.delete_request(&request.id)?;
        Ok(())
    }

    /// Leave the current gang. Returns the updated gang, or `None` when the
    /// departure emptied the gang and it was deleted.
    pub fn leave_gang(&mut self, player_id: &str) -> Result<Option<GangRecord>, GangWarsError> {
        let mut player = self.store.get_player(player_id)?;
        let gang_id = player.gang_id.take().ok_or(GangWarsError::NotInGang)?;
        player.role = Role::Grunt;

        let mut gang = self.store.get_gang(&gang_id)?;
        gang.remove_member(&player.id);
        self.store.put_player(player)?;

        if gang.members.is_empty() {
            self.store.delete_gang(&gang.id)?;
            info!("gang {} dissolved, last member left", escape_log(&gang.name));
            return Ok(None);
        }
        self.store.put_gang(gang.clone())?;
        Ok(Some(gang))
    }

    /// Disband a gang. The actor must be a member; every member is released
    /// back to gangless `Grunt`, outstanding join requests for the gang are
    /// dropped, and the gang record is deleted.
    pub fn disband(&mut self, gang_id: &str, actor_id: &str) -> Result<(), GangWarsError> {
        let gang = self.store.get_gang(gang_id)?;
        if !gang.has_member(actor_id) {
            return Err(GangWarsError::PermissionDenied(
                "only a member may disband the gang".to_string(),
            ));
        }

        for member_id in &gang.members {
            if let Some(mut member) = self.store.lookup_player(member_id)? {
                member.gang_id = None;
                member.role = Role::Grunt;
                self.store.put_player(member)?;
            }
        }
        for request in self.store.list_requests()? {
            if request.gang_id == gang.id {
                self.store.delete_request(&request.id)?;
            }
        }
        self.store.delete_gang(&gang.id)?;
        warn!(
            "gang {} disbanded by {}",
            escape_log(&gang.name),
            escape_log(actor_id)
        );
        Ok(())
    }

    /// Assign a member's role within the actor's gang.
    ///
    /// Only the God Father may assign roles, only between `Grunt` and
    /// `Lieutenant` (the God Father seat is granted by founding a gang, not
    /// assignment), and never to themselves.
    pub fn set_role(
        &mut self,
        actor_id: &str,
        member_id: &str,
        role: Role,
    ) -> Result<(), GangWarsError> {
        if role == Role::GodFather {
            return Err(GangWarsError::PermissionDenied(
                "the God Father seat is earned by founding a gang".to_string(),
            ));
        }
        if actor_id == member_id {
            return Err(GangWarsError::PermissionDenied(
                "cannot change your own role".to_string(),
            ));
        }
        let actor = self.store.get_player(actor_id)?;
        let actor_gang = actor.gang_id.ok_or(GangWarsError::NotInGang)?;
        if actor.role != Role::GodFather {
            return Err(GangWarsError::PermissionDenied(
                "only the God Father assigns roles".to_string(),
            ));
        }
        let mut member = self.store.get_player(member_id)?;
        if member.gang_id.as_deref() != Some(actor_gang.as_str()) {
            return Err(GangWarsError::NotInGang);
        }
        member.role = role;
        self.store.put_player(member)?;
        info!(
            "{} set role {} for {}",
            escape_log(actor_id),
            role,
            escape_log(member_id)
        );
        Ok(())
    }

    /// Record a member's vote to disband. Idempotent per player. Returns the
    /// current vote count; nothing happens automatically at any threshold.
    pub fn vote_disband(&mut self, player_id: &str) -> Result<usize, GangWarsError> {
        let player = self.store.get_player(player_id)?;
        let gang_id = player.gang_id.ok_or(GangWarsError::NotInGang)?;
        let mut gang = self.store.get_gang(&gang_id)?;
        if !gang.disband_votes.iter().any(|v| v == &player.id) {
            gang.disband_votes.push(player.id.clone());
            self.store.put_gang(gang.clone())?;
        }
        Ok(gang.disband_votes.len())
    }
}
