//! Worklist-based update resolution.
//!
//! The finder computes the closure of updates needed to bring a set of
//! root components, and everything their new versions require, to
//! mutually satisfying versions. Pending requirements live in an explicit
//! queue with a floor map keyed by component identity rather than a call
//! stack, so cyclic dependency descriptors terminate: re-adding an
//! identity the batch already guarantees is a no-op, and re-adding a
//! pending identity merely raises its floor.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use qm_channels::ChannelResolver;
use qm_model::{Artifact, ComponentId, Gav, Manifest, UpdateAction, Version};

use crate::error::{Error, Result};

/// The ordered batch of update actions one resolution produced.
///
/// Roots come first in manifest order, then requirements in discovery
/// order; at most one action per identity.
#[derive(Debug, Default)]
pub struct UpdatePlan {
    actions: Vec<UpdateAction>,
}

impl UpdatePlan {
    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action for one identity, if the plan contains it.
    pub fn action_for(&self, id: &ComponentId) -> Option<&UpdateAction> {
        self.actions.iter().find(|action| action.id() == id)
    }
}

/// How one requirement was settled against the installation.
#[derive(Debug)]
pub enum ConstraintOutcome {
    /// The installed version is below the floor; this action raises it.
    NeedsUpdate(UpdateAction),
    /// The installed version already meets the floor.
    AlreadySatisfied(Version),
}

/// Resolution state for one finder run.
#[derive(Default)]
struct Worklist {
    actions: Vec<UpdateAction>,
    /// Version each settled identity is guaranteed at after the batch.
    guaranteed: HashMap<ComponentId, Version>,
    /// Identities with an action in `actions`.
    updated: HashSet<ComponentId>,
    queue: VecDeque<ComponentId>,
    /// Highest requirement floor seen for each pending identity.
    floors: HashMap<ComponentId, Version>,
}

impl Worklist {
    /// Queue one requirement, deduplicated by identity.
    fn push(&mut self, requirement: &Gav) -> Result<()> {
        let id = requirement.id();
        let floor = requirement.version();

        if let Some(current) = self.guaranteed.get(id) {
            if current >= floor {
                return Ok(());
            }
            if self.updated.contains(id) {
                // The action already holds the highest available version;
                // a higher floor cannot be met by searching again.
                return Err(Error::UnresolvedConstraint {
                    id: id.clone(),
                    floor: floor.clone(),
                    best: Some(current.clone()),
                });
            }
            // Settled at the installed version only; re-examine with the
            // higher floor.
            self.guaranteed.remove(id);
        }

        match self.floors.get_mut(id) {
            Some(existing) => {
                if floor > existing {
                    *existing = floor.clone();
                }
            }
            None => {
                self.floors.insert(id.clone(), floor.clone());
                self.queue.push_back(id.clone());
            }
        }
        Ok(())
    }

    fn settle(&mut self, id: &ComponentId, version: Version, acted: bool) {
        self.guaranteed.insert(id.clone(), version);
        if acted {
            self.updated.insert(id.clone());
        }
    }
}

/// Computes update plans over an installed manifest and a channel
/// resolver.
pub struct UpdateFinder<'a> {
    manifest: &'a Manifest,
    resolver: &'a ChannelResolver,
}

impl<'a> UpdateFinder<'a> {
    pub fn new(manifest: &'a Manifest, resolver: &'a ChannelResolver) -> Self {
        Self { manifest, resolver }
    }

    /// Plan updates for every installed component.
    pub fn find_updates(&self) -> Result<UpdatePlan> {
        let roots: Vec<ComponentId> = self
            .manifest
            .artifacts()
            .iter()
            .map(|artifact| artifact.id().clone())
            .collect();
        self.run(&roots)
    }

    /// Plan updates rooted at a single component.
    pub fn find_update(&self, id: &ComponentId) -> Result<UpdatePlan> {
        self.run(std::slice::from_ref(id))
    }

    fn run(&self, roots: &[ComponentId]) -> Result<UpdatePlan> {
        let mut state = Worklist::default();

        // All roots settle before any requirement is examined.
        for root in roots {
            let installed = self.installed(root)?;
            let latest = self.resolver.find_latest(installed)?;
            if latest.version() <= installed.version() {
                debug!(component = %root, version = %installed.version(), "already current");
                state.settle(root, installed.version().clone(), false);
                continue;
            }

            let new = installed.with_version(latest.version().clone());
            debug!(component = %root, old = %installed.version(), new = %new.version(), "root update");
            state.settle(root, new.version().clone(), true);
            state
                .actions
                .push(UpdateAction::new(installed.clone(), new.clone())?);
            self.push_requirements(&mut state, new.gav())?;
        }

        while let Some(id) = state.queue.pop_front() {
            let Some(floor) = state.floors.remove(&id) else {
                continue;
            };
            // A root settled after this identity was queued may already
            // cover the floor.
            if let Some(current) = state.guaranteed.get(&id) {
                if current >= &floor {
                    continue;
                }
                if state.updated.contains(&id) {
                    return Err(Error::UnresolvedConstraint {
                        id,
                        floor,
                        best: Some(current.clone()),
                    });
                }
                state.guaranteed.remove(&id);
            }
            match self.evaluate(&id, &floor)? {
                ConstraintOutcome::AlreadySatisfied(version) => {
                    debug!(component = %id, floor = %floor, "requirement already satisfied");
                    state.settle(&id, version, false);
                }
                ConstraintOutcome::NeedsUpdate(action) => {
                    debug!(component = %id, action = %action, "requirement update");
                    let new_gav = action.new_artifact().gav().clone();
                    state.settle(&id, action.new_version().clone(), true);
                    state.actions.push(action);
                    // Expand the newly resolved artifact's own descriptor,
                    // not the root's.
                    self.push_requirements(&mut state, &new_gav)?;
                }
            }
        }

        Ok(UpdatePlan {
            actions: state.actions,
        })
    }

    /// Settle one requirement floor against the installation and the
    /// channels.
    pub fn evaluate(&self, id: &ComponentId, floor: &Version) -> Result<ConstraintOutcome> {
        let installed = self.installed(id)?;
        if installed.version() >= floor {
            return Ok(ConstraintOutcome::AlreadySatisfied(
                installed.version().clone(),
            ));
        }

        let latest = match self.resolver.find_latest(installed) {
            Ok(latest) => latest,
            Err(qm_channels::Error::ArtifactNotFound { id }) => {
                return Err(Error::UnresolvedConstraint {
                    id,
                    floor: floor.clone(),
                    best: None,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if latest.version() < floor {
            return Err(Error::UnresolvedConstraint {
                id: id.clone(),
                floor: floor.clone(),
                best: Some(latest.version().clone()),
            });
        }

        let new = installed.with_version(latest.version().clone());
        Ok(ConstraintOutcome::NeedsUpdate(UpdateAction::new(
            installed.clone(),
            new,
        )?))
    }

    fn push_requirements(&self, state: &mut Worklist, gav: &Gav) -> Result<()> {
        if let Some(descriptor) = self.resolver.resolve_descriptor(gav)? {
            for requirement in descriptor.requirements() {
                state.push(requirement)?;
            }
        }
        Ok(())
    }

    fn installed(&self, id: &ComponentId) -> Result<&'a Artifact> {
        self.manifest
            .find(id)
            .ok_or_else(|| Error::ComponentNotInstalled { id: id.clone() })
    }
}
