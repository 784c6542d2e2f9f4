//! Well-known event, action and operation ids.
//!
//! Behavior files refer to events and actions by number. These are the numbers
//! the built-in state machines and interactors understand.

// ============================================================================
// Event ids
// ============================================================================

/// Event ids produced by the event mapper or posted internally by guard actions.
pub mod event_ids {
    pub const EIDNULLEVENT: i32 = 0;
    pub const EIDLEFTMOUSEBTN: i32 = 1;
    pub const EIDRIGHTMOUSEBTN: i32 = 2;
    pub const EIDLEFTMOUSEBTNANDSHIFT: i32 = 3;
    pub const EIDMIDDLEMOUSEBTN: i32 = 4;
    pub const EIDLEFTMOUSEBTNANDCTRL: i32 = 5;
    pub const EIDMIDDLEMOUSEBTNANDCTRL: i32 = 6;
    pub const EIDRIGHTMOUSEBTNANDCTRL: i32 = 7;
    pub const EIDLEFTMOUSEBTNDOUBLECLICK: i32 = 8;
    pub const EIDMOUSEWHEEL: i32 = 9;
    pub const EIDSTRGANDN: i32 = 10;
    pub const EIDSTRGANDE: i32 = 11;
    pub const EIDDELETE: i32 = 12;
    pub const EIDN: i32 = 13;
    pub const EIDESCAPE: i32 = 14;
    pub const EIDLEFTMOUSERELEASE: i32 = 505;
    pub const EIDMIDDLEMOUSERELEASE: i32 = 506;
    pub const EIDRIGHTMOUSERELEASE: i32 = 507;
    pub const EIDLEFTMOUSERELEASEANDSHIFT: i32 = 508;
    pub const EIDMOUSEMOVE: i32 = 520;
    pub const EIDLEFTMOUSEBTNANDMOUSEMOVE: i32 = 530;
    pub const EIDRIGHTMOUSEBTNANDMOUSEMOVE: i32 = 531;
    pub const EIDMIDDLEMOUSEBTNANDMOUSEMOVE: i32 = 533;
    pub const EIDNEW: i32 = 1000;
    pub const EIDOLD: i32 = 1001;
    pub const EIDFINISHED: i32 = 1002;
    pub const EIDNO: i32 = 1003;
    pub const EIDYES: i32 = 1004;
    pub const EIDSAME: i32 = 1005;
    pub const EIDNOANDLASTOBJECT: i32 = 1006;
    pub const EIDNOANDNOTLASTOBJECT: i32 = 1007;
    pub const EIDLAST: i32 = 1008;
    pub const EIDNOTLAST: i32 = 1009;
    pub const EIDSTSMALERNMINUS1: i32 = 1010;
    pub const EIDSTLARGERNMINUS1: i32 = 1011;
    pub const EIDPOSITIONEVENT: i32 = 1012;
    pub const EIDEDIT: i32 = 1013;
    pub const EIDSMALLERN: i32 = 1014;
    pub const EIDEQUALSN: i32 = 1015;
    pub const EIDLARGERN: i32 = 1016;
    pub const EIDEMPTY: i32 = 1017;
    pub const EIDSUBDESELECT: i32 = 1020;
    pub const EIDSMTOSELECTED: i32 = 1030;
    pub const EIDSMTODESELECTED: i32 = 1031;
}

// ============================================================================
// Action ids
// ============================================================================

/// Action ids that behavior files attach to transitions.
pub mod action_ids {
    pub const ACDONOTHING: i32 = 0;
    pub const ACTRANSMITEVENT: i32 = 2000;
    pub const ACINITMOVEMENT: i32 = 8;
    pub const ACINITMOVE: i32 = 9;
    pub const ACADDPOINT: i32 = 10;
    pub const ACCHECKELEMENT: i32 = 30;
    pub const ACCHECKNMINUS1: i32 = 32;
    pub const ACCHECKEQUALS1: i32 = 33;
    pub const ACCHECKSELECTED: i32 = 34;
    pub const ACCHECKOPERATION: i32 = 37;
    pub const ACFINISHMOVEMENT: i32 = 42;
    pub const ACFINISHMOVE: i32 = 43;
    pub const ACCHECKONESELECTED: i32 = 44;
    pub const ACCHECKNUMBEROFPOINTS: i32 = 45;
    pub const ACSELECTPICKEDOBJECT: i32 = 60;
    pub const ACDESELECTOBJECT: i32 = 70;
    pub const ACDESELECTALL: i32 = 72;
    pub const ACMOVE: i32 = 92;
    pub const ACMOVESELECTED: i32 = 91;
    pub const ACREMOVEPOINT: i32 = 100;
    pub const ACREMOVEALL: i32 = 103;
    pub const ACCLEAR: i32 = 130;
    pub const ACINITZOOM: i32 = 1011;
    pub const ACZOOM: i32 = 1012;
    pub const ACMODEDESELECT: i32 = 1100;
    pub const ACMODESELECT: i32 = 1101;
    pub const ACMODESUBSELECT: i32 = 1102;
    pub const ACINFORMLISTENERS: i32 = 1200;
    pub const ACASKINTERACTORS: i32 = 1201;
}

// ============================================================================
// Operation ids
// ============================================================================

/// Operation type ids carried by undoable operations.
pub mod operation_ids {
    pub const OPNOTHING: i32 = 0;
    pub const OPINSERT: i32 = 200;
    pub const OPMOVE: i32 = 300;
    pub const OPREMOVE: i32 = 400;
    pub const OPSTATECHANGE: i32 = 600;
    pub const OPTIMECHANGE: i32 = 601;
    pub const OPSELECTPOINT: i32 = 700;
    pub const OPDESELECTPOINT: i32 = 800;
    pub const OPZOOM: i32 = 1000;
    pub const OPMODECHANGE: i32 = 1500;
}

// ============================================================================
// Defaults
// ============================================================================

/// Name of the pattern driving the global dispatcher in the stock behavior file.
pub const DEFAULT_GLOBAL_PATTERN: &str = "global";

/// Default picking precision for point sets, in world units.
pub const DEFAULT_POINT_PRECISION: f64 = 5.0;

/// Default number of undo entries kept by [`crate::UndoStack`].
pub const DEFAULT_UNDO_HISTORY: usize = 100;

/// Jurisdiction scores at or below this value never enter the jurisdiction map.
pub const DEFAULT_JURISDICTION_THRESHOLD: f32 = 0.0;
