// src/noyau/lecture.rs
//
// Lecture numérique d'un arbre : Expr -> f64.
// - littéraux exacts arrondis UNE fois (BigRational -> f64)
// - valeurs suffixées "deg" = angles (Valeur::Angle), jamais des réels nus
// - NaN après n'importe quelle opération => NonReel (résultat complexe / hors domaine)
// - ±∞ est un résultat légitime (1/0, Infinity) ; un ∞ né d'opérandes finis
//   par débordement (10^400, 171!) est refusé : Depassement

use num_rational::BigRational;
use num_traits::ToPrimitive;

use std::f64::consts::{E, PI};

use super::erreurs::ErreurEval;
use super::expr::{coeff_pi_en_degres, Expr, Fonction};
use super::trig::{trig_special, TrigFn, TrigOutcome};

/// Valeur intermédiaire : réel nu ou angle en degrés.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Valeur {
    Reel(f64),
    Angle(f64),
}

/// Factorielle au-delà : dépasse f64.
const MAX_FACTORIELLE: u32 = 170;

/// Lit l'arbre entier. Un angle nu en sortie n'est pas un nombre.
pub fn lire(expr: &Expr) -> Result<f64, ErreurEval> {
    match valeur(expr)? {
        Valeur::Reel(x) => Ok(x),
        Valeur::Angle(_) => Err(ErreurEval::Unite),
    }
}

fn reel(x: f64) -> Result<Valeur, ErreurEval> {
    if x.is_nan() {
        Err(ErreurEval::NonReel)
    } else {
        Ok(Valeur::Reel(x))
    }
}

fn angle(x: f64) -> Result<Valeur, ErreurEval> {
    if x.is_nan() {
        Err(ErreurEval::NonReel)
    } else {
        Ok(Valeur::Angle(x))
    }
}

/// Résultat d'une opération sur des réels finis : ∞ ici = débordement f64.
fn fini(x: f64, operandes: &[f64]) -> Result<Valeur, ErreurEval> {
    if x.is_infinite() && operandes.iter().all(|o| o.is_finite()) {
        return Err(ErreurEval::Depassement);
    }
    reel(x)
}

/// Réel exigé (fonctions non trigonométriques, exposants, …).
fn exiger_reel(v: Valeur) -> Result<f64, ErreurEval> {
    match v {
        Valeur::Reel(x) => Ok(x),
        Valeur::Angle(_) => Err(ErreurEval::Unite),
    }
}

fn rationnel_vers_f64(r: &BigRational) -> Result<f64, ErreurEval> {
    match r.to_f64() {
        Some(x) if x.is_finite() => Ok(x),
        Some(_) => Err(ErreurEval::Depassement),
        None => Err(ErreurEval::NombreInvalide(r.to_string())),
    }
}

fn constante(nom: &str) -> Result<Valeur, ErreurEval> {
    match nom {
        "pi" => Ok(Valeur::Reel(PI)),
        "e" => Ok(Valeur::Reel(E)),
        "infinity" => Ok(Valeur::Reel(f64::INFINITY)),
        "emptyset" => Err(ErreurEval::EnsembleVide),
        autre => Err(ErreurEval::Symbole(autre.to_string())),
    }
}

/// Vrai si `nom` est une constante lisible (pas un symbole libre).
pub fn est_constante(nom: &str) -> bool {
    matches!(nom, "pi" | "e" | "infinity" | "emptyset")
}

fn valeur(expr: &Expr) -> Result<Valeur, ErreurEval> {
    use Expr::*;

    match expr {
        Nombre(r) => Ok(Valeur::Reel(rationnel_vers_f64(r)?)),
        Ident(nom) => constante(nom),

        Neg(x) => match valeur(x)? {
            Valeur::Reel(v) => reel(-v),
            Valeur::Angle(v) => angle(-v),
        },

        Add(a, b) | Sub(a, b) => {
            let signe = if matches!(expr, Sub(..)) { -1.0 } else { 1.0 };
            match (valeur(a)?, valeur(b)?) {
                (Valeur::Reel(x), Valeur::Reel(y)) => fini(x + signe * y, &[x, y]),
                (Valeur::Angle(x), Valeur::Angle(y)) => angle(x + signe * y),
                _ => Err(ErreurEval::Unite),
            }
        }

        Mul(a, b) => match (valeur(a)?, valeur(b)?) {
            (Valeur::Reel(x), Valeur::Reel(y)) => fini(x * y, &[x, y]),
            (Valeur::Angle(x), Valeur::Reel(y)) | (Valeur::Reel(y), Valeur::Angle(x)) => {
                angle(x * y)
            }
            (Valeur::Angle(_), Valeur::Angle(_)) => Err(ErreurEval::Unite),
        },

        Div(a, b) => match (valeur(a)?, valeur(b)?) {
            (Valeur::Reel(x), Valeur::Reel(y)) if y == 0.0 => reel(x / y),
            (Valeur::Reel(x), Valeur::Reel(y)) => fini(x / y, &[x, y]),
            (Valeur::Angle(x), Valeur::Reel(y)) => angle(x / y),
            // 90deg / 30deg = 3
            (Valeur::Angle(x), Valeur::Angle(y)) => reel(x / y),
            (Valeur::Reel(_), Valeur::Angle(_)) => Err(ErreurEval::Unite),
        },

        Pow(a, b) => {
            let x = exiger_reel(valeur(a)?)?;
            let y = exiger_reel(valeur(b)?)?;
            // 0^-1 = ∞ : division par zéro, pas un débordement
            if x == 0.0 {
                reel(x.powf(y))
            } else {
                fini(x.powf(y), &[x, y])
            }
        }

        Factorielle(x) => reel(factorielle(exiger_reel(valeur(x)?)?)?),

        Pourcent(x) => match valeur(x)? {
            Valeur::Reel(v) => reel(v / 100.0),
            Valeur::Angle(_) => Err(ErreurEval::Unite),
        },

        Degres(x) => match valeur(x)? {
            Valeur::Reel(v) => angle(v),
            Valeur::Angle(_) => Err(ErreurEval::Unite),
        },

        Appel(Fonction::Trig(f), args) => trig(*f, args),
        Appel(f, args) => appel(*f, args),
    }
}

fn factorielle(n: f64) -> Result<f64, ErreurEval> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(ErreurEval::Indefini("factorielle"));
    }
    if n > f64::from(MAX_FACTORIELLE) {
        return Err(ErreurEval::Depassement);
    }
    // n entier dans [0, 170]
    let n = n as u32;
    Ok((2..=n).fold(1.0, |acc, k| acc * f64::from(k)))
}

/// Arguments déjà contrôlés (arité) par rpn.rs ; on relit quand même sans indexer.
fn argument(args: &[Expr], i: usize) -> Result<Valeur, ErreurEval> {
    let e = args.get(i).ok_or(ErreurEval::Syntaxe("argument manquant"))?;
    valeur(e)
}

fn appel(f: Fonction, args: &[Expr]) -> Result<Valeur, ErreurEval> {
    let x0 = argument(args, 0)?;

    // abs garde l'unité : |−30°| = 30°
    if f == Fonction::Abs {
        return match x0 {
            Valeur::Reel(v) => reel(v.abs()),
            Valeur::Angle(v) => angle(v.abs()),
        };
    }

    let x = exiger_reel(x0)?;
    let y = match f {
        Fonction::Sqrt => x.sqrt(),
        Fonction::Cbrt => x.cbrt(),
        Fonction::NthRoot => {
            let n = if args.len() > 1 {
                exiger_reel(argument(args, 1)?)?
            } else {
                2.0
            };
            racine_n(x, n)?
        }
        Fonction::Exp => return fini(x.exp(), &[x]),
        Fonction::Ln => x.ln(),
        Fonction::Log10 => x.log10(),
        Fonction::Log2 => x.log2(),
        Fonction::Log => {
            if args.len() > 1 {
                let base = exiger_reel(argument(args, 1)?)?;
                x.ln() / base.ln()
            } else {
                x.ln()
            }
        }
        // traités plus haut
        Fonction::Abs | Fonction::Trig(_) => return Err(ErreurEval::Syntaxe("appel")),
    };
    reel(y)
}

/// Racine n-ième réelle : radicande négatif accepté pour n entier impair.
fn racine_n(x: f64, n: f64) -> Result<f64, ErreurEval> {
    if n == 0.0 {
        return Err(ErreurEval::Indefini("nthRoot"));
    }
    if x < 0.0 {
        let impair = n.fract() == 0.0 && n.rem_euclid(2.0) == 1.0;
        if !impair {
            return Err(ErreurEval::NonReel);
        }
        return Ok(-(-x).powf(1.0 / n));
    }
    Ok(x.powf(1.0 / n))
}

fn trig(f: TrigFn, args: &[Expr]) -> Result<Valeur, ErreurEval> {
    let arg = args.first().ok_or(ErreurEval::Syntaxe("argument manquant"))?;

    if !f.est_directe() {
        let x = exiger_reel(valeur(arg)?)?;
        return reel(f.appliquer(x));
    }

    // sin(pi/6), tan(pi/2) : multiple rationnel de π reconnu AVANT l'arrondi f64
    if let Some(deg) = arg.coeff_pi().as_ref().and_then(coeff_pi_en_degres) {
        if let Some(out) = trig_special(deg, f) {
            return issue_speciale(out, f);
        }
    }

    match valeur(arg)? {
        Valeur::Angle(deg) => {
            if deg.fract() == 0.0 && deg.abs() < 1e15 {
                if let Some(out) = trig_special(deg as i64, f) {
                    return issue_speciale(out, f);
                }
            }
            reel(f.appliquer(deg.to_radians()))
        }
        Valeur::Reel(rad) => reel(f.appliquer(rad)),
    }
}

fn issue_speciale(out: TrigOutcome, f: TrigFn) -> Result<Valeur, ErreurEval> {
    match out {
        TrigOutcome::Valeur(v) => reel(v),
        TrigOutcome::Indefini => Err(ErreurEval::Indefini(f.nom())),
    }
}
