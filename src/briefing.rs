//! Offline tactical briefings
//!
//! A fixed catalog of short briefings, picked by context: UV risk first, then
//! the protocol day, then the phase. Used directly when no AI key is set and
//! as the fallback when the AI or weather calls fail.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::timeline::Phase;
use crate::weather::HIGH_UV_THRESHOLD;

/// ---------------------------------------------------------------------------
/// Catalog
/// ---------------------------------------------------------------------------

pub const SUNDAY_OPS: &[&str] = &[
  "OPERATION SHIELD: Torso is the target today. Keep the head at 90 degrees. Precision on the chest decides the final result.",
  "GRADIENT PROTOCOL: Shoulders are in play. Aim for transition, not total removal. A checkerboard pattern keeps the look natural.",
  "TORSO INCURSION: Chest and abdomen in the sights. Overlap flashes by 20% so no stripes are left behind.",
  "PHOTON FILTER: The sternum is sensitive. Press the head firmly to distract the nerve and limit the heat.",
  "ACROMION OBJECTIVE: Mark the shoulder border. Past the armpit line the hair is friendly territory. Hold fire.",
  "SURFACE SWEEP: Lower abdomen in the crosshairs. Stretch the skin so the light reaches the follicle directly.",
  "PECS FOCUS: Work in tidy vertical rows. Random flashes leave patches.",
  "SHOULDER INTEL: Trim to 1mm before firing. Long hair soaks up energy and weakens each flash.",
  "SUNDAY MISSION: Short but technical. A quiet Sunday is ideal for precise torso mapping.",
  "CRITICAL STERNUM: Thin skin over bone. Single flash, no heavy overlap here.",
  "HEAT CONTROL: If the glass runs hot, pause 30 seconds and let the fans work.",
  "END OF TORSO MISSION: Target neutralised. Apply aloe vera and get ready for tomorrow's leg run.",
];

pub const MONDAY_OPS: &[&str] = &[
  "BLUE MONDAY SURVIVAL: Monday is beaten with fire. Hit the legs at full power. Laziness is the enemy.",
  "OPERATION TITAN: Thighs in the sights. Largest area of the week. Switch to continuous mode and keep moving.",
  "IMPACT ZONE SHINS: Pain alert. Over the bone absorption is higher. Drop one power level if needed.",
  "CALF SWEEP: Cover the back of the leg. Use a floor mirror so no flank is left exposed.",
  "TOTAL ASSAULT: Legs and glutes. Longest session of the week. Stay hydrated and keep a steady rhythm.",
  "MONDAY LOGISTICS: You shaved last night. The skin is ready. Run the sequence before the day wears you down.",
  "ENDURANCE MISSION: Forty minutes of operation. The metronome is your guide. Flash, glide, repeat.",
  "KNEE MANOEUVRE: Bend the joint to tension the skin. A stretched follicle is an easier target.",
  "QUADRICEPS DRILL: Split the thigh into three vertical strips. Clear them one at a time.",
  "BACK OF THE KNEE: Delicate skin. Do not overlap here. One flash is enough.",
  "MONDAY PSYCHOLOGY: The pain is temporary. Smooth skin is permanent. Execute without hesitation.",
  "END OF MONDAY TRANSMISSION: Volume operation complete. Blue Monday defeated.",
];

pub const PHASE_1: &[&str] = &[
  "OPENING HOSTILITIES: What you hit today takes 14 days to fall. Chase execution, not instant results.",
  "WEEKLY BOMBARDMENT: We are in the attack phase. Consistency is the only road to victory.",
  "REGROWTH ALERT: Hair may look stronger before it dies. It is a defence reaction. Keep firing.",
  "ANAGEN PROTOCOL: We are syncing growth cycles. Skip a session and you lose the tactical edge.",
  "WAR OF ATTRITION: Every flash weakens the follicle. You cannot see it yet, but the damage is real.",
  "SURGICAL STRIKE: Leave no millimetre untreated. Phase 1 takes no survivors.",
  "TACTICAL RECALIBRATION: If the sting fades, raise the power. No heat, no victory.",
  "GOLDEN RULE: Perfect shave means a painless session. Use a fresh blade.",
  "GROWTH INTEL: Hair does not grow all at once. That is why we strike every single week.",
  "END OF ATTACK: Week 12 on the horizon. Prepare to lower the frequency soon.",
];

pub const PHASE_2_3: &[&str] = &[
  "SNIPER MODE: Phase 2. Fire only where you see activity. Efficiency over volume.",
  "FORTNIGHTLY WATCH: No lowering the guard. One session every 14 days to clear the stragglers.",
  "DAMAGE CONTROL: Find the islands of hair that survived winter. Hit them at full power.",
  "MAINTENANCE STATUS: Once a month only. A reminder to the follicles of who is in charge.",
  "OPERATION SUMMER: Phase 3. Quick touch-up sessions keep the skin sharp.",
  "TOUCH-UP SESSION: Ten minutes is enough now. Quality over quantity.",
  "REGROWTH WATCH: Hormones or stress can wake follicles. Fire without mercy if it happens.",
  "AUGUST EXCEPTION: If the sun is extreme, abort. We resume in September.",
  "CRUISE PHASE: This is no longer a war. It is a routine patrol. Keep order.",
  "CYCLE INTEL: Hair has memory. Do not give it time to remember how to grow.",
];

pub const SAFETY: &[&str] = &[
  "SOLAR STORM: UV index above 6. If you were exposed today, suspend the mission. The burn risk is real.",
  "TAN ALERT: If your skin tone has changed, the device cannot tell hair from tissue. Proceed with extreme caution.",
  "CRITICAL SENSOR: High UV detected. Skin is under heat stress. Hydrate and cancel IPL today.",
  "PHOTOPROTECTION INTEL: If you go out after the session, cover the treated areas.",
  "EYE SAFETY: Goggles on? Reflected flashes can damage the retina.",
  "IRRITATION ALERT: If the skin is red before you start, abort. Never fire on inflamed tissue.",
  "POST-SUN STRATEGY: Beach within the last 48 hours means residual heat in the skin. Wait.",
  "72-HOUR RULE: Keep treated areas out of direct sun for at least three days.",
];

pub const FLAVOR: &[&str] = &[
  "LINK ESTABLISHED: Equipment at 100%. Capacitors charged. Begin the sequence.",
  "BIOHACKING ACTIVE: Today's discipline is tomorrow's pride.",
  "IRON DISCIPLINE: You are not a user, you are an operator. Keep the schedule and results follow.",
  "MARKET INTEL: Every flash saves you clinic money. Your return grows with each session.",
  "SYSTEMS ONLINE: Heat sensors ready. Metronome synced. Proceed to the operations area.",
  "ORDER OF THE DAY: Shave, flash, hydrate. Repeat until total victory.",
  "PSYCHOLOGICAL INTEL: Your brain will say today is not needed. Ignore it.",
  "TACTICAL LEGACY: In a few months this routine will be a memory and your skin the trophy.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BriefingCategory {
  SundayOps,
  MondayOps,
  Phase1,
  Phase2And3,
  Safety,
  Flavor,
}

impl BriefingCategory {
  pub fn entries(&self) -> &'static [&'static str] {
    match self {
      Self::SundayOps => SUNDAY_OPS,
      Self::MondayOps => MONDAY_OPS,
      Self::Phase1 => PHASE_1,
      Self::Phase2And3 => PHASE_2_3,
      Self::Safety => SAFETY,
      Self::Flavor => FLAVOR,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Selection
/// ---------------------------------------------------------------------------

const SAFETY_BIAS: f64 = 0.8;
const SESSION_DAY_BIAS: f64 = 0.7;
const PHASE_BIAS: f64 = 0.6;

fn pick<R: Rng + ?Sized>(entries: &[&'static str], rng: &mut R) -> &'static str {
  entries.choose(rng).copied().unwrap_or_default()
}

/// Pick a briefing for the given context.
///
/// `day_number` counts from Sunday (0 = Sunday, 1 = Monday). High UV wins most
/// of the time; on session days the day-specific advice is favoured, on rest
/// days the phase advice. Anything else falls back to a mix with flavor text.
pub fn context_aware_briefing<R: Rng + ?Sized>(
  phase: Phase,
  day_number: u32,
  uv_index: f64,
  rng: &mut R,
) -> &'static str {
  if uv_index >= HIGH_UV_THRESHOLD && rng.gen_bool(SAFETY_BIAS) {
    return pick(SAFETY, rng);
  }

  let (focus, bias) = match (day_number, phase) {
    (0, _) => (BriefingCategory::SundayOps, SESSION_DAY_BIAS),
    (1, _) => (BriefingCategory::MondayOps, SESSION_DAY_BIAS),
    (_, Phase::Attack) => (BriefingCategory::Phase1, PHASE_BIAS),
    _ => (BriefingCategory::Phase2And3, PHASE_BIAS),
  };

  if rng.gen_bool(bias) {
    return pick(focus.entries(), rng);
  }

  let pool: Vec<&'static str> = focus.entries().iter().chain(FLAVOR).copied().collect();
  pick(&pool, rng)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
