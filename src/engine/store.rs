//! Domain store: the single source of truth for groups, presentations,
//! performance records and templates.
//!
//! All mutation goes through named commands on `DomainStore`. Commands are
//! serialized by one mutex held for the duration of each command; nothing
//! awaits or performs I/O under the lock, so commands observe a total
//! order. Each command validates before mutating (all-or-nothing) and
//! publishes its event on the bus inside the same serialized section, so
//! subscribers never see an event/state ordering inversion. Reads return
//! snapshot clones.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::engine::events::{EventBus, EventPayload, RealTimeEvent};
use crate::engine::ids::new_id;
use crate::engine::poll::{ensure_answer_shape, ensure_can_activate, poll_results};
use crate::engine::types::*;
use crate::engine::{performance, report};
use crate::errors::EngineError;

#[derive(Default)]
struct EngineState {
    groups: HashMap<String, Group>,
    presentations: HashMap<String, LivePresentation>,
    /// Keyed by (user_id, group_id).
    performances: HashMap<(String, String), UserPerformance>,
    templates: HashMap<String, GroupTemplate>,
}

/// In-memory canonical state plus the bus it publishes to. One instance
/// per embedding application; constructor-injected, never a singleton.
pub struct DomainStore {
    state: Mutex<EngineState>,
    bus: Arc<EventBus>,
}

const DEFAULT_MAX_SIZE: u32 = 20;
const DEFAULT_CATEGORY: &str = "General";

impl DomainStore {
    pub fn new(bus: Arc<EventBus>) -> Self {
        DomainStore {
            state: Mutex::new(EngineState::default()),
            bus,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().expect("domain store lock poisoned")
    }

    // ========================================================================
    // GROUPS
    // ========================================================================

    pub fn create_group(&self, input: NewGroup) -> Result<Group, EngineError> {
        let mut state = self.lock();
        let group = Self::insert_group(&mut state, input, None)?;
        log::debug!("group created: {} ({})", group.id, group.name);
        self.bus.publish(RealTimeEvent::now(EventPayload::GroupCreated {
            group_id: group.id.clone(),
            name: group.name.clone(),
        }));
        Ok(group)
    }

    /// Shared by `create_group` and `use_template`; template fields win
    /// over the caller's size/category/tags when a seed is present.
    fn insert_group(
        state: &mut EngineState,
        input: NewGroup,
        seed: Option<&GroupTemplate>,
    ) -> Result<Group, EngineError> {
        if input.name.trim().is_empty() {
            return Err(EngineError::Validation("group name must not be empty".into()));
        }
        let now = Utc::now();
        let group = Group {
            id: new_id("grp"),
            name: input.name,
            description: input.description,
            category: match seed {
                Some(t) => t.category.clone(),
                None => input.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            },
            tags: match seed {
                Some(t) => t.tags.clone(),
                None => input.tags,
            },
            trainer_id: input.trainer_id,
            tenant_id: input.tenant_id,
            members: Vec::new(),
            max_size: match seed {
                Some(t) => Some(t.max_size),
                None => Some(input.max_size.unwrap_or(DEFAULT_MAX_SIZE)),
            },
            is_active: true,
            created_at: now,
            updated_at: now,
            metrics: GroupPerformanceMetrics::default(),
        };
        state.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    pub fn update_group(&self, group_id: &str, update: GroupUpdate) -> Result<Group, EngineError> {
        let mut state = self.lock();
        let group = state
            .groups
            .get_mut(group_id)
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id}")))?;

        // Validate everything before touching any field (all-or-nothing).
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(EngineError::Validation("group name must not be empty".into()));
            }
        }
        if let Some(max_size) = update.max_size {
            if (max_size as usize) < group.members.len() {
                return Err(EngineError::Validation(format!(
                    "max_size {max_size} is below current member count {}",
                    group.members.len()
                )));
            }
        }

        if let Some(name) = update.name {
            group.name = name;
        }
        if let Some(description) = update.description {
            group.description = Some(description);
        }
        if let Some(category) = update.category {
            group.category = category;
        }
        if let Some(tags) = update.tags {
            group.tags = tags;
        }
        if let Some(max_size) = update.max_size {
            group.max_size = Some(max_size);
        }
        if let Some(is_active) = update.is_active {
            group.is_active = is_active;
        }
        if let Some(metrics) = update.metrics {
            group.metrics = metrics;
        }
        group.updated_at = Utc::now();

        let snapshot = group.clone();
        log::debug!("group updated: {group_id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::GroupUpdated {
            group_id: group_id.to_string(),
        }));
        Ok(snapshot)
    }

    pub fn delete_group(&self, group_id: &str) -> Result<(), EngineError> {
        let mut state = self.lock();
        state
            .groups
            .remove(group_id)
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id}")))?;
        log::debug!("group deleted: {group_id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::GroupDeleted {
            group_id: group_id.to_string(),
        }));
        Ok(())
    }

    pub fn add_member(
        &self,
        group_id: &str,
        user_id: &str,
        role: Option<MemberRole>,
    ) -> Result<GroupMember, EngineError> {
        let mut state = self.lock();
        let group = state
            .groups
            .get_mut(group_id)
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id}")))?;

        if group.members.iter().any(|m| m.user_id == user_id) {
            return Err(EngineError::Validation(format!(
                "user {user_id} is already a member of group {group_id}"
            )));
        }
        if let Some(max) = group.max_size {
            if group.members.len() >= max as usize {
                return Err(EngineError::Validation(format!(
                    "group {group_id} is full (max {max})"
                )));
            }
        }

        let member = GroupMember {
            user_id: user_id.to_string(),
            joined_at: Utc::now(),
            role: role.unwrap_or_default(),
            status: MemberStatus::Active,
            performance_score: None,
            last_activity: None,
        };
        group.members.push(member.clone());
        group.updated_at = Utc::now();

        log::debug!("member {user_id} added to group {group_id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::UserJoined {
            user_id: user_id.to_string(),
            group_id: Some(group_id.to_string()),
            presentation_id: None,
        }));
        Ok(member)
    }

    /// No-op when the user is not a member; the leave event is only
    /// published when a member was actually removed.
    pub fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), EngineError> {
        let mut state = self.lock();
        let group = state
            .groups
            .get_mut(group_id)
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id}")))?;

        let before = group.members.len();
        group.members.retain(|m| m.user_id != user_id);
        if group.members.len() == before {
            return Ok(());
        }
        group.updated_at = Utc::now();

        log::debug!("member {user_id} removed from group {group_id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::UserLeft {
            user_id: user_id.to_string(),
            group_id: Some(group_id.to_string()),
            presentation_id: None,
        }));
        Ok(())
    }

    // ========================================================================
    // TEMPLATES
    // ========================================================================

    pub fn create_template(&self, input: NewTemplate) -> Result<GroupTemplate, EngineError> {
        if input.name.trim().is_empty() {
            return Err(EngineError::Validation("template name must not be empty".into()));
        }
        let template = GroupTemplate {
            id: new_id("tpl"),
            name: input.name,
            description: input.description,
            max_size: input.max_size,
            category: input.category,
            tags: input.tags,
            trainer_id: input.trainer_id,
            is_public: input.is_public,
            usage_count: 0,
            created_at: Utc::now(),
        };
        let mut state = self.lock();
        state.templates.insert(template.id.clone(), template.clone());
        log::debug!("template created: {} ({})", template.id, template.name);
        self.bus.publish(RealTimeEvent::now(EventPayload::TemplateCreated {
            template_id: template.id.clone(),
        }));
        Ok(template)
    }

    /// Instantiate a group from a template. Deliberately not idempotent:
    /// each call creates a distinct group and bumps `usage_count` by one.
    pub fn use_template(
        &self,
        template_id: &str,
        input: NewGroup,
    ) -> Result<Group, EngineError> {
        let mut state = self.lock();
        let template = state
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("template {template_id}")))?;

        let group = Self::insert_group(&mut state, input, Some(&template))?;
        if let Some(t) = state.templates.get_mut(template_id) {
            t.usage_count += 1;
        }

        log::debug!("template {template_id} used for group {}", group.id);
        self.bus.publish(RealTimeEvent::now(EventPayload::GroupCreated {
            group_id: group.id.clone(),
            name: group.name.clone(),
        }));
        self.bus.publish(RealTimeEvent::now(EventPayload::TemplateUsed {
            template_id: template_id.to_string(),
            group_id: group.id.clone(),
        }));
        Ok(group)
    }

    // ========================================================================
    // PRESENTATIONS
    // ========================================================================

    pub fn create_presentation(
        &self,
        input: NewPresentation,
    ) -> Result<LivePresentation, EngineError> {
        if input.title.trim().is_empty() {
            return Err(EngineError::Validation("presentation title must not be empty".into()));
        }
        if input.total_slides == 0 {
            return Err(EngineError::Validation("total_slides must be at least 1".into()));
        }
        let mut state = self.lock();
        if let Some(group_id) = &input.group_id {
            if !state.groups.contains_key(group_id) {
                return Err(EngineError::NotFound(format!("group {group_id}")));
            }
        }
        let presentation = LivePresentation {
            id: new_id("prs"),
            title: input.title,
            description: input.description,
            trainer_id: input.trainer_id,
            group_id: input.group_id,
            status: PresentationStatus::Preparing,
            current_slide: 1,
            total_slides: input.total_slides,
            started_at: None,
            ended_at: None,
            participants: Vec::new(),
            polls: Vec::new(),
            created_at: Utc::now(),
        };
        state
            .presentations
            .insert(presentation.id.clone(), presentation.clone());
        log::debug!("presentation created: {} ({})", presentation.id, presentation.title);
        self.bus.publish(RealTimeEvent::now(EventPayload::PresentationCreated {
            presentation_id: presentation.id.clone(),
            title: presentation.title.clone(),
        }));
        Ok(presentation)
    }

    pub fn start_presentation(&self, id: &str) -> Result<LivePresentation, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, id)?;
        if presentation.status != PresentationStatus::Preparing {
            return Err(EngineError::StateConflict(format!(
                "presentation {id} cannot start from {:?}",
                presentation.status
            )));
        }
        presentation.status = PresentationStatus::Live;
        presentation.started_at = Some(Utc::now());
        let snapshot = presentation.clone();

        log::info!("presentation started: {id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::PresentationStarted {
            presentation_id: id.to_string(),
            title: snapshot.title.clone(),
        }));
        Ok(snapshot)
    }

    pub fn pause_presentation(&self, id: &str) -> Result<LivePresentation, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, id)?;
        if presentation.status != PresentationStatus::Live {
            return Err(EngineError::StateConflict(format!(
                "presentation {id} cannot pause from {:?}",
                presentation.status
            )));
        }
        presentation.status = PresentationStatus::Paused;
        let snapshot = presentation.clone();

        log::info!("presentation paused: {id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::PresentationPaused {
            presentation_id: id.to_string(),
        }));
        Ok(snapshot)
    }

    pub fn resume_presentation(&self, id: &str) -> Result<LivePresentation, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, id)?;
        if presentation.status != PresentationStatus::Paused {
            return Err(EngineError::StateConflict(format!(
                "presentation {id} cannot resume from {:?}",
                presentation.status
            )));
        }
        presentation.status = PresentationStatus::Live;
        let snapshot = presentation.clone();

        log::info!("presentation resumed: {id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::PresentationResumed {
            presentation_id: id.to_string(),
        }));
        Ok(snapshot)
    }

    /// Ending freezes every poll's active flag at its current value; the
    /// presentation and its polls accept no further mutation.
    pub fn end_presentation(&self, id: &str) -> Result<LivePresentation, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, id)?;
        match presentation.status {
            PresentationStatus::Live | PresentationStatus::Paused => {}
            status => {
                return Err(EngineError::StateConflict(format!(
                    "presentation {id} cannot end from {status:?}"
                )));
            }
        }
        presentation.status = PresentationStatus::Ended;
        presentation.ended_at = Some(Utc::now());
        let snapshot = presentation.clone();

        log::info!("presentation ended: {id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::PresentationEnded {
            presentation_id: id.to_string(),
        }));
        Ok(snapshot)
    }

    pub fn set_slide(&self, id: &str, slide: u32) -> Result<LivePresentation, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, id)?;
        if presentation.status == PresentationStatus::Ended {
            return Err(EngineError::StateConflict(format!("presentation {id} has ended")));
        }
        if slide == 0 || slide > presentation.total_slides {
            return Err(EngineError::Validation(format!(
                "slide {slide} out of range 1..={}",
                presentation.total_slides
            )));
        }
        presentation.current_slide = slide;
        let snapshot = presentation.clone();

        self.bus.publish(RealTimeEvent::now(EventPayload::SlideChanged {
            presentation_id: id.to_string(),
            slide,
        }));
        Ok(snapshot)
    }

    pub fn join_presentation(&self, id: &str, user_id: &str) -> Result<(), EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, id)?;
        if presentation.status == PresentationStatus::Ended {
            return Err(EngineError::StateConflict(format!("presentation {id} has ended")));
        }
        let already_present = presentation
            .participants
            .iter()
            .any(|p| p.user_id == user_id && p.left_at.is_none());
        if already_present {
            return Err(EngineError::Validation(format!(
                "user {user_id} already joined presentation {id}"
            )));
        }
        presentation.participants.push(Participant {
            user_id: user_id.to_string(),
            joined_at: Utc::now(),
            left_at: None,
        });

        log::debug!("user {user_id} joined presentation {id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::UserJoined {
            user_id: user_id.to_string(),
            group_id: None,
            presentation_id: Some(id.to_string()),
        }));
        Ok(())
    }

    /// Marks `left_at` instead of removing the row, keeping the attendance
    /// record; no-op when the user is not currently present.
    pub fn leave_presentation(&self, id: &str, user_id: &str) -> Result<(), EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, id)?;
        let participant = presentation
            .participants
            .iter_mut()
            .find(|p| p.user_id == user_id && p.left_at.is_none());
        let Some(participant) = participant else {
            return Ok(());
        };
        participant.left_at = Some(Utc::now());

        log::debug!("user {user_id} left presentation {id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::UserLeft {
            user_id: user_id.to_string(),
            group_id: None,
            presentation_id: Some(id.to_string()),
        }));
        Ok(())
    }

    // ========================================================================
    // POLLS
    // ========================================================================

    pub fn add_poll(&self, presentation_id: &str, input: NewPoll) -> Result<LivePoll, EngineError> {
        if input.question.trim().is_empty() {
            return Err(EngineError::Validation("poll question must not be empty".into()));
        }
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, presentation_id)?;
        if presentation.status == PresentationStatus::Ended {
            return Err(EngineError::StateConflict(format!(
                "presentation {presentation_id} has ended"
            )));
        }
        let poll = LivePoll {
            id: new_id("poll"),
            question: input.question,
            poll_type: input.poll_type,
            options: input.options,
            is_active: false,
            time_limit_secs: input.time_limit_secs,
            created_at: Utc::now(),
            responses: Vec::new(),
        };
        presentation.polls.push(poll.clone());

        log::debug!("poll {} added to presentation {presentation_id}", poll.id);
        self.bus.publish(RealTimeEvent::now(EventPayload::PollCreated {
            presentation_id: presentation_id.to_string(),
            poll_id: poll.id.clone(),
            question: poll.question.clone(),
        }));
        Ok(poll)
    }

    pub fn activate_poll(
        &self,
        presentation_id: &str,
        poll_id: &str,
    ) -> Result<LivePoll, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, presentation_id)?;
        if presentation.status == PresentationStatus::Ended {
            return Err(EngineError::StateConflict(format!(
                "presentation {presentation_id} has ended"
            )));
        }
        let poll = Self::poll_mut(presentation, poll_id)?;
        ensure_can_activate(poll)?;
        poll.is_active = true;
        let snapshot = poll.clone();

        log::info!("poll activated: {poll_id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::PollActivated {
            presentation_id: presentation_id.to_string(),
            poll_id: poll_id.to_string(),
        }));
        Ok(snapshot)
    }

    pub fn deactivate_poll(
        &self,
        presentation_id: &str,
        poll_id: &str,
    ) -> Result<LivePoll, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, presentation_id)?;
        if presentation.status == PresentationStatus::Ended {
            return Err(EngineError::StateConflict(format!(
                "presentation {presentation_id} has ended"
            )));
        }
        let poll = Self::poll_mut(presentation, poll_id)?;
        poll.is_active = false;
        let snapshot = poll.clone();

        log::info!("poll deactivated: {poll_id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::PollDeactivated {
            presentation_id: presentation_id.to_string(),
            poll_id: poll_id.to_string(),
        }));
        Ok(snapshot)
    }

    /// Append a response. Rejected when the poll is inactive; one user may
    /// submit more than once (live audiences are allowed to re-answer).
    pub fn submit_response(
        &self,
        presentation_id: &str,
        poll_id: &str,
        input: SubmitResponse,
    ) -> Result<PollResponse, EngineError> {
        let mut state = self.lock();
        let presentation = Self::presentation_mut(&mut state, presentation_id)?;
        if presentation.status == PresentationStatus::Ended {
            return Err(EngineError::StateConflict(format!(
                "presentation {presentation_id} has ended"
            )));
        }
        let poll = Self::poll_mut(presentation, poll_id)?;
        if !poll.is_active {
            return Err(EngineError::StateConflict(format!(
                "poll {poll_id} is not active"
            )));
        }
        ensure_answer_shape(poll, &input.answer)?;

        let response = PollResponse {
            id: new_id("resp"),
            poll_id: poll_id.to_string(),
            user_id: input.user_id,
            answer: input.answer,
            submitted_at: Utc::now(),
            response_time_ms: input.response_time_ms,
        };
        poll.responses.push(response.clone());

        log::debug!("response {} recorded for poll {poll_id}", response.id);
        self.bus.publish(RealTimeEvent::now(EventPayload::PollResponse {
            presentation_id: presentation_id.to_string(),
            poll_id: poll_id.to_string(),
            response_id: response.id.clone(),
            user_id: response.user_id.clone(),
        }));
        Ok(response)
    }

    /// Derived results for one poll, recomputed from the response list.
    pub fn poll_results(
        &self,
        presentation_id: &str,
        poll_id: &str,
    ) -> Result<PollResults, EngineError> {
        let state = self.lock();
        let presentation = state
            .presentations
            .get(presentation_id)
            .ok_or_else(|| EngineError::NotFound(format!("presentation {presentation_id}")))?;
        let poll = presentation
            .polls
            .iter()
            .find(|p| p.id == poll_id)
            .ok_or_else(|| EngineError::NotFound(format!("poll {poll_id}")))?;
        Ok(poll_results(presentation, poll))
    }

    pub fn presentation_analytics(
        &self,
        presentation_id: &str,
    ) -> Result<PresentationAnalytics, EngineError> {
        let state = self.lock();
        let presentation = state
            .presentations
            .get(presentation_id)
            .ok_or_else(|| EngineError::NotFound(format!("presentation {presentation_id}")))?;
        Ok(crate::engine::poll::analytics(presentation))
    }

    fn presentation_mut<'a>(
        state: &'a mut EngineState,
        id: &str,
    ) -> Result<&'a mut LivePresentation, EngineError> {
        state
            .presentations
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound(format!("presentation {id}")))
    }

    fn poll_mut<'a>(
        presentation: &'a mut LivePresentation,
        poll_id: &str,
    ) -> Result<&'a mut LivePoll, EngineError> {
        presentation
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .ok_or_else(|| EngineError::NotFound(format!("poll {poll_id}")))
    }

    // ========================================================================
    // PERFORMANCE & REPORTS
    // ========================================================================

    /// Create-or-merge a user's performance record for a group. The group
    /// itself is not required to exist in the store; performance records
    /// are top-level entities referenced by id.
    pub fn update_performance(
        &self,
        user_id: &str,
        group_id: &str,
        update: MetricsUpdate,
    ) -> Result<UserPerformance, EngineError> {
        let now = Utc::now();
        let mut state = self.lock();
        let key = (user_id.to_string(), group_id.to_string());
        let perf = state
            .performances
            .entry(key)
            .or_insert_with(|| performance::blank(user_id, group_id, now));
        performance::apply_update(perf, &update, now);
        let snapshot = perf.clone();

        log::debug!("performance updated: user {user_id}, group {group_id}");
        self.bus.publish(RealTimeEvent::now(EventPayload::PerformanceUpdated {
            user_id: user_id.to_string(),
            group_id: group_id.to_string(),
        }));
        Ok(snapshot)
    }

    pub fn top_performers(&self, group_id: &str, limit: usize) -> Vec<UserPerformance> {
        let perfs = self.performances(Some(group_id));
        performance::top_performers(&perfs, limit)
    }

    pub fn improvement_areas(&self, group_id: &str) -> Vec<UserPerformance> {
        let perfs = self.performances(Some(group_id));
        performance::improvement_areas(&perfs)
    }

    pub fn group_report(
        &self,
        group_id: &str,
        period: ReportPeriod,
    ) -> Result<GroupReport, EngineError> {
        let state = self.lock();
        let group = state
            .groups
            .get(group_id)
            .ok_or_else(|| EngineError::NotFound(format!("group {group_id}")))?;
        let mut perfs: Vec<UserPerformance> = state
            .performances
            .values()
            .filter(|p| p.group_id == group_id)
            .cloned()
            .collect();
        perfs.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(report::generate_group_report(group, &perfs, period))
    }

    // ========================================================================
    // READ ACCESSORS
    // ========================================================================

    pub fn groups(&self) -> Vec<Group> {
        let state = self.lock();
        let mut groups: Vec<Group> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        groups
    }

    pub fn group(&self, id: &str) -> Option<Group> {
        self.lock().groups.get(id).cloned()
    }

    pub fn presentations(&self) -> Vec<LivePresentation> {
        let state = self.lock();
        let mut items: Vec<LivePresentation> = state.presentations.values().cloned().collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        items
    }

    pub fn presentation(&self, id: &str) -> Option<LivePresentation> {
        self.lock().presentations.get(id).cloned()
    }

    pub fn performances(&self, group_id: Option<&str>) -> Vec<UserPerformance> {
        let state = self.lock();
        let mut perfs: Vec<UserPerformance> = state
            .performances
            .values()
            .filter(|p| group_id.is_none_or(|g| p.group_id == g))
            .cloned()
            .collect();
        perfs.sort_by(|a, b| a.group_id.cmp(&b.group_id).then(a.user_id.cmp(&b.user_id)));
        perfs
    }

    pub fn performance(&self, user_id: &str, group_id: &str) -> Option<UserPerformance> {
        self.lock()
            .performances
            .get(&(user_id.to_string(), group_id.to_string()))
            .cloned()
    }

    pub fn templates(&self) -> Vec<GroupTemplate> {
        let state = self.lock();
        let mut templates: Vec<GroupTemplate> = state.templates.values().cloned().collect();
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        templates
    }

    pub fn template(&self, id: &str) -> Option<GroupTemplate> {
        self.lock().templates.get(id).cloned()
    }
}
