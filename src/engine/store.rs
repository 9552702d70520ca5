use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::index::{instance_index, rule_index};
use crate::model::*;

/// A rule together with its resolved modifier relationships.
#[derive(Debug, Clone)]
pub struct RuleNode {
    pub rule: RecordingRule,
    /// Set on override/don't-record nodes once their main rule is known.
    pub main_id: Option<u32>,
    /// Modifiers scoped to occurrences of this main rule.
    pub modifiers: Vec<RecordingRule>,
}

impl RuleNode {
    pub fn new(rule: RecordingRule) -> Self {
        Self { rule, main_id: None, modifiers: Vec::new() }
    }

    pub fn is_modifier(&self) -> bool {
        self.rule.is_modifier()
    }
}

/// In-memory snapshot of the backend's rules and upcoming instances.
#[derive(Debug, Default)]
pub struct ScheduleGraph {
    nodes: HashMap<u32, RuleNode>,
    /// Rule ids in backend order.
    order: Vec<u32>,
    by_index: HashMap<u32, u32>,
    instances: BTreeMap<u32, ScheduledInstance>,
    /// Owning rule id -> instance indices, in backend order.
    by_rule: HashMap<u32, Vec<u32>>,
    templates: Vec<RecordingRule>,
}

impl ScheduleGraph {
    /// Build a graph from full backend snapshots. `same_timeslot` links
    /// modifiers that carry no usable parent id.
    pub fn build<F>(rules: Vec<RecordingRule>, upcoming: Vec<ScheduledInstance>, same_timeslot: F) -> Self
    where
        F: Fn(&RecordingRule, &RecordingRule) -> bool,
    {
        let mut graph = ScheduleGraph::default();

        for rule in rules {
            if rule.rule_type == RuleType::Template {
                graph.templates.push(rule);
                continue;
            }
            let id = rule.record_id;
            if graph.nodes.contains_key(&id) {
                warn!(record_id = id, "duplicate rule id in schedule list");
                continue;
            }
            graph.insert_node(RuleNode::new(rule));
        }

        graph.link_modifiers(same_timeslot);

        for instance in upcoming {
            graph.insert_instance(instance);
        }
        graph
    }

    fn link_modifiers<F>(&mut self, same_timeslot: F)
    where
        F: Fn(&RecordingRule, &RecordingRule) -> bool,
    {
        let mut links = Vec::new();
        for id in &self.order {
            let node = &self.nodes[id];
            if !node.is_modifier() {
                continue;
            }
            let parent = node.rule.parent_id;
            let main = if parent != 0 && parent != *id && self.nodes.get(&parent).is_some_and(|n| !n.is_modifier()) {
                Some(parent)
            } else {
                self.order
                    .iter()
                    .find(|cand| {
                        let c = &self.nodes[*cand];
                        !c.is_modifier() && same_timeslot(&node.rule, &c.rule)
                    })
                    .copied()
            };
            match main {
                Some(main) => links.push((*id, main)),
                None => warn!(record_id = id, "modifier has no main rule"),
            }
        }
        for (modifier, main) in links {
            let rule = self.nodes[&modifier].rule.clone();
            if let Some(node) = self.nodes.get_mut(&modifier) {
                node.main_id = Some(main);
            }
            if let Some(node) = self.nodes.get_mut(&main) {
                node.modifiers.push(rule);
            }
        }
    }

    fn insert_node(&mut self, node: RuleNode) {
        let id = node.rule.record_id;
        self.order.push(id);
        self.by_index.insert(rule_index(id), id);
        self.nodes.insert(id, node);
    }

    fn insert_instance(&mut self, instance: ScheduledInstance) {
        let index = instance_index(instance.record_id, &instance.uid);
        let rule_ids = self.by_rule.entry(instance.record_id).or_default();
        if !rule_ids.contains(&index) {
            rule_ids.push(index);
        }
        self.instances.insert(index, instance);
    }

    // ── Lookups ──────────────────────────────────────────

    pub fn rule_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.instances.len()
    }

    pub fn node(&self, record_id: u32) -> Option<&RuleNode> {
        self.nodes.get(&record_id)
    }

    pub fn node_by_index(&self, index: u32) -> Option<&RuleNode> {
        self.by_index.get(&index).and_then(|id| self.nodes.get(id))
    }

    /// Nodes in backend order.
    pub fn nodes(&self) -> impl Iterator<Item = &RuleNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn instance(&self, index: u32) -> Option<&ScheduledInstance> {
        self.instances.get(&index)
    }

    /// Instances ordered by index.
    pub fn instances(&self) -> impl Iterator<Item = (u32, &ScheduledInstance)> {
        self.instances.iter().map(|(i, p)| (*i, p))
    }

    /// Instances owned by a rule, in backend order.
    pub fn upcoming_for_rule(&self, record_id: u32) -> Vec<(u32, &ScheduledInstance)> {
        self.by_rule
            .get(&record_id)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|i| self.instances.get(i).map(|p| (*i, p)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Most recent instance of a rule.
    pub fn last_upcoming(&self, record_id: u32) -> Option<(u32, &ScheduledInstance)> {
        self.upcoming_for_rule(record_id).pop()
    }

    /// Main rule a node belongs to: its linked parent for modifiers, itself otherwise.
    pub fn main_rule_id(&self, record_id: u32) -> Option<u32> {
        let node = self.nodes.get(&record_id)?;
        if node.is_modifier() { node.main_id } else { Some(record_id) }
    }

    pub fn templates(&self) -> &[RecordingRule] {
        &self.templates
    }

    // ── Sync after backend writes ────────────────────────

    /// Add a newly created main rule.
    pub fn add_rule(&mut self, rule: RecordingRule) {
        if self.nodes.contains_key(&rule.record_id) {
            self.replace_rule(rule);
        } else {
            self.insert_node(RuleNode::new(rule));
        }
    }

    /// Add a newly created modifier and link it to `main_id`.
    pub fn attach_modifier(&mut self, main_id: u32, modifier: RecordingRule) {
        if let Some(main) = self.nodes.get_mut(&main_id) {
            main.modifiers.push(modifier.clone());
        }
        let mut node = RuleNode::new(modifier);
        node.main_id = self.nodes.contains_key(&main_id).then_some(main_id);
        self.insert_node(node);
    }

    /// Store the backend's new version of an existing rule.
    pub fn replace_rule(&mut self, rule: RecordingRule) {
        let id = rule.record_id;
        let Some(node) = self.nodes.get_mut(&id) else { return };
        node.rule = rule.clone();
        if let Some(main_id) = node.main_id
            && let Some(main) = self.nodes.get_mut(&main_id)
            && let Some(slot) = main.modifiers.iter_mut().find(|m| m.record_id == id)
        {
            *slot = rule;
        }
    }

    /// Record the status the backend is expected to report after a write.
    pub fn set_instance_status(&mut self, index: u32, status: RecordingStatus) {
        if let Some(instance) = self.instances.get_mut(&index) {
            instance.status = status;
        }
    }

    /// Forget a rule, its modifier bookkeeping and the instances it owns.
    pub fn remove_rule(&mut self, record_id: u32) {
        let Some(node) = self.nodes.remove(&record_id) else { return };
        self.order.retain(|id| *id != record_id);
        self.by_index.remove(&rule_index(record_id));
        if let Some(main_id) = node.main_id
            && let Some(main) = self.nodes.get_mut(&main_id)
        {
            main.modifiers.retain(|m| m.record_id != record_id);
        }
        for m in &node.modifiers {
            if let Some(child) = self.nodes.get_mut(&m.record_id) {
                child.main_id = None;
            }
        }
        if let Some(indices) = self.by_rule.remove(&record_id) {
            for i in indices {
                self.instances.remove(&i);
            }
        }
    }
}
