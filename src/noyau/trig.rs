// src/noyau/trig.rs
//
// Famille trigonométrique (directes, réciproques, hyperboliques)
// -------------------------------------------------------------
// - Angles “exactement reconnus” : multiples entiers de 30° et de 45°
//   (réduction modulo 360°, table sur le premier quadrant)
// - tan(90°), cot(0°), sec(90°), csc(180°)… => indéfini (jamais 1.6e16)
// - Réciproques / hyperboliques : f64 direct (argument réel, pas d'angle)

use std::f64::consts::FRAC_1_SQRT_2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,

    Asin,
    Acos,
    Atan,
    Asec,
    Acsc,
    Acot,

    Sinh,
    Cosh,
    Tanh,
    Sech,
    Csch,
    Coth,

    Asinh,
    Acosh,
    Atanh,
    Asech,
    Acsch,
    Acoth,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrigOutcome {
    Valeur(f64),
    Indefini,
}

impl TrigFn {
    pub fn depuis_nom(nom: &str) -> Option<TrigFn> {
        use TrigFn::*;
        let f = match nom {
            "sin" => Sin,
            "cos" => Cos,
            "tan" => Tan,
            "sec" => Sec,
            "csc" => Csc,
            "cot" => Cot,
            "asin" => Asin,
            "acos" => Acos,
            "atan" => Atan,
            "asec" => Asec,
            "acsc" => Acsc,
            "acot" => Acot,
            "sinh" => Sinh,
            "cosh" => Cosh,
            "tanh" => Tanh,
            "sech" => Sech,
            "csch" => Csch,
            "coth" => Coth,
            "asinh" => Asinh,
            "acosh" => Acosh,
            "atanh" => Atanh,
            "asech" => Asech,
            "acsch" => Acsch,
            "acoth" => Acoth,
            _ => return None,
        };
        Some(f)
    }

    pub fn nom(self) -> &'static str {
        use TrigFn::*;
        match self {
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Sec => "sec",
            Csc => "csc",
            Cot => "cot",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
            Asec => "asec",
            Acsc => "acsc",
            Acot => "acot",
            Sinh => "sinh",
            Cosh => "cosh",
            Tanh => "tanh",
            Sech => "sech",
            Csch => "csch",
            Coth => "coth",
            Asinh => "asinh",
            Acosh => "acosh",
            Atanh => "atanh",
            Asech => "asech",
            Acsch => "acsch",
            Acoth => "acoth",
        }
    }

    /// sin, cos, tan, sec, csc, cot : seules fonctions qui acceptent un angle.
    pub fn est_directe(self) -> bool {
        use TrigFn::*;
        matches!(self, Sin | Cos | Tan | Sec | Csc | Cot)
    }

    /// Application numérique, argument en radians (ou réel pour les réciproques).
    /// Le NaN éventuel est laissé à l'appelant.
    pub fn appliquer(self, x: f64) -> f64 {
        use TrigFn::*;
        match self {
            Sin => x.sin(),
            Cos => x.cos(),
            Tan => x.tan(),
            Sec => 1.0 / x.cos(),
            Csc => 1.0 / x.sin(),
            Cot => x.cos() / x.sin(),

            Asin => x.asin(),
            Acos => x.acos(),
            Atan => x.atan(),
            Asec => (1.0 / x).acos(),
            Acsc => (1.0 / x).asin(),
            Acot => (1.0 / x).atan(),

            Sinh => x.sinh(),
            Cosh => x.cosh(),
            Tanh => x.tanh(),
            Sech => 1.0 / x.cosh(),
            Csch => 1.0 / x.sinh(),
            Coth => 1.0 / x.tanh(),

            Asinh => x.asinh(),
            Acosh => x.acosh(),
            Atanh => x.atanh(),
            Asech => (1.0 / x).acosh(),
            Acsch => (1.0 / x).asinh(),
            Acoth => (1.0 / x).atanh(),
        }
    }
}

/// Reconnaît les angles spéciaux (degrés entiers) pour les six fonctions directes.
///
/// Retour:
/// - Some(Valeur(v)) si l'angle est un multiple de 30° ou de 45°
/// - Some(Indefini) si le dénominateur s'annule (tan(90°), cot(180°), …)
/// - None si non reconnu (fonction non directe, angle quelconque)
pub fn trig_special(degres: i64, f: TrigFn) -> Option<TrigOutcome> {
    if !f.est_directe() || (degres % 30 != 0 && degres % 45 != 0) {
        return None;
    }

    let k = degres.rem_euclid(360);
    let s = sin_table(k)?;
    let c = sin_table((k + 90).rem_euclid(360))?;

    let quotient = |num: f64, den: f64| {
        if den == 0.0 {
            TrigOutcome::Indefini
        } else {
            TrigOutcome::Valeur(num / den)
        }
    };

    let out = match f {
        TrigFn::Sin => TrigOutcome::Valeur(s),
        TrigFn::Cos => TrigOutcome::Valeur(c),
        TrigFn::Tan => quotient(s, c),
        TrigFn::Cot => quotient(c, s),
        TrigFn::Sec => quotient(1.0, c),
        TrigFn::Csc => quotient(1.0, s),
        _ => return None,
    };

    Some(out)
}

/* ------------------------ Outils ------------------------ */

/// sin(k°) pour k ∈ [0,360) multiple de 30 ou 45.
/// Symétries : sin(k) = -sin(k-180) ; sin(k) = sin(180-k).
fn sin_table(k: i64) -> Option<f64> {
    if k >= 180 {
        return sin_table(k - 180).map(|v| -v);
    }
    let k = if k > 90 { 180 - k } else { k };
    let v = match k {
        0 => 0.0,
        30 => 0.5,
        45 => FRAC_1_SQRT_2,
        60 => 3f64.sqrt() / 2.0,
        90 => 1.0,
        _ => return None,
    };
    Some(v)
}
