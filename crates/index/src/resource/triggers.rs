//! The static rs2 trigger table.
//!
//! A trigger line reads `[trigger,name]`. Declaring triggers introduce a new
//! script identifier of the given kind; referencing triggers attach a script
//! to an already-declared entity (an npc, loc, obj, or component), so the
//! name is a reference to that entity instead.

use crate::types::MatchKindId;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    /// Kind of the name (second word) on the trigger line.
    pub kind: MatchKindId,
    /// Whether the name is a true declaration of that kind.
    pub declaration: bool,
}

const fn declares(kind: MatchKindId) -> Trigger {
    Trigger {
        kind,
        declaration: true,
    }
}

const fn refers(kind: MatchKindId) -> Trigger {
    Trigger {
        kind,
        declaration: false,
    }
}

static TRIGGERS: Lazy<FxHashMap<&'static str, Trigger>> = Lazy::new(|| {
    let mut map: FxHashMap<&'static str, Trigger> = FxHashMap::default();

    map.insert("proc", declares(MatchKindId::Proc));
    map.insert("debugproc", declares(MatchKindId::Proc));
    map.insert("label", declares(MatchKindId::Label));
    map.insert("queue", declares(MatchKindId::Queue));
    map.insert("weakqueue", declares(MatchKindId::Queue));
    map.insert("timer", declares(MatchKindId::Timer));
    map.insert("softtimer", declares(MatchKindId::Softtimer));
    map.insert("command", declares(MatchKindId::Command));

    for n in 1..=5u32 {
        let op_npc: &'static str = Box::leak(format!("opnpc{n}").into_boxed_str());
        let ap_npc: &'static str = Box::leak(format!("apnpc{n}").into_boxed_str());
        let op_loc: &'static str = Box::leak(format!("oploc{n}").into_boxed_str());
        let ap_loc: &'static str = Box::leak(format!("aploc{n}").into_boxed_str());
        let op_obj: &'static str = Box::leak(format!("opobj{n}").into_boxed_str());
        let ap_obj: &'static str = Box::leak(format!("apobj{n}").into_boxed_str());
        let op_held: &'static str = Box::leak(format!("opheld{n}").into_boxed_str());
        map.insert(op_npc, refers(MatchKindId::Npc));
        map.insert(ap_npc, refers(MatchKindId::Npc));
        map.insert(op_loc, refers(MatchKindId::Loc));
        map.insert(ap_loc, refers(MatchKindId::Loc));
        map.insert(op_obj, refers(MatchKindId::Obj));
        map.insert(ap_obj, refers(MatchKindId::Obj));
        map.insert(op_held, refers(MatchKindId::Obj));
    }
    map.insert("opheldu", refers(MatchKindId::Obj));
    map.insert("opheldt", refers(MatchKindId::Obj));
    map.insert("ai_timer", refers(MatchKindId::Npc));
    map.insert("ai_queue1", refers(MatchKindId::Npc));
    map.insert("ai_queue2", refers(MatchKindId::Npc));
    map.insert("ai_queue3", refers(MatchKindId::Npc));
    map.insert("if_button", refers(MatchKindId::Component));
    map.insert("if_close", refers(MatchKindId::Interface));

    map
});

/// Look up a trigger keyword (case-insensitive lookups happen at the caller).
pub fn trigger(name: &str) -> Option<Trigger> {
    TRIGGERS.get(name).copied()
}
