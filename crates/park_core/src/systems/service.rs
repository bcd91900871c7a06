//! Admission shared by every system that can free a slot or add to a line.

use bevy_ecs::prelude::{Entity, Query};

use crate::clock::{minutes_to_ms, ms_to_minutes, EventKind, EventSubject, SimulationClock};
use crate::config::Behaviour;
use crate::distributions::{sample_stages, ParkRng};
use crate::ecs::{Satisfaction, Visitor, VisitorState};
use crate::error::SimFault;
use crate::facility::{try_start_service, Admission, Facility, ServerState, WaitingLine};
use crate::metrics::ParkMetrics;

pub type FacilityQuery<'w, 's> =
    Query<'w, 's, (&'static Facility, &'static mut WaitingLine, &'static mut ServerState)>;

pub type VisitorQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Visitor,
        &'static mut VisitorState,
        &'static mut Satisfaction,
    ),
>;

/// Resources touched when groups move into service.
pub struct ServiceContext<'a> {
    pub clock: &'a mut SimulationClock,
    pub rng: &'a mut ParkRng,
    pub metrics: &'a mut ParkMetrics,
    pub fault: &'a mut SimFault,
    pub behaviour: &'a Behaviour,
}

/// Starts whatever the facility can admit right now.
///
/// Each cohort draws one service duration; every group in it gets its own
/// `ServiceComplete` at the same time. Tours also book the instructor's
/// return after the break, and blocked disciplines get a `FacilityRetry`.
pub fn admit_waiting(
    facility_entity: Entity,
    facilities: &mut FacilityQuery,
    visitors: &mut VisitorQuery,
    ctx: &mut ServiceContext<'_>,
) {
    let Ok((facility, mut line, mut servers)) = facilities.get_mut(facility_entity) else {
        return;
    };
    let now = ctx.clock.now();
    let outcome = match try_start_service(facility, &mut line, &mut servers, now) {
        Ok(outcome) => outcome,
        Err(error) => {
            ctx.fault.raise(error);
            return;
        }
    };

    for cohort in &outcome.cohorts {
        let duration_ms = minutes_to_ms(sample_stages(&facility.duration, ctx.rng.inner()));
        for entry in &cohort.entries {
            let wait_ms = entry.wait_ms(now);
            if let Some(stats) = ctx.metrics.facility_mut(facility.id) {
                stats.record_start(wait_ms, entry.express, entry.group_size, servers.busy);
            }
            if let Ok((_, mut state, mut satisfaction)) = visitors.get_mut(entry.visitor) {
                *state = VisitorState::Served {
                    facility: facility_entity,
                    since: now,
                };
                let excess = ms_to_minutes(wait_ms) - ctx.behaviour.wait_tolerance_minutes;
                if ctx.behaviour.wait_penalty_per_minute > 0.0 && excess > 0.0 {
                    satisfaction.adjust(-excess * ctx.behaviour.wait_penalty_per_minute);
                }
            }
            ctx.clock.schedule_in(
                duration_ms,
                EventKind::ServiceComplete,
                Some(EventSubject::Visit {
                    visitor: entry.visitor,
                    facility: facility_entity,
                }),
            );
        }

        if let (Some(slot), Admission::Tour { break_ms, .. }) = (cohort.instructor, &facility.admission) {
            ctx.clock.schedule_in(
                duration_ms + break_ms,
                EventKind::InstructorReturn,
                Some(EventSubject::Instructor {
                    facility: facility_entity,
                    slot,
                }),
            );
        }
    }

    ctx.metrics.observe_queue(facility.id, now, line.len());

    if let Some(at) = outcome.retry_at {
        if servers.retry_at.map_or(true, |pending| at < pending) {
            match ctx.clock.schedule_at(
                at,
                EventKind::FacilityRetry,
                Some(EventSubject::Facility(facility_entity)),
            ) {
                Ok(_) => servers.retry_at = Some(at),
                Err(error) => ctx.fault.raise(error),
            }
        }
    }
}
