// src/noyau/expr.rs
//
// Arbre d'expression (construit par rpn.rs, interprété par lecture.rs).
// - Nombre : littéral décimal exact (rationnel)
// - Ident  : constante ou symbole (pi, e, infinity, x…) : lecture.rs décide
// - Appel  : fonction résolue + arguments (arité vérifiée à la construction)
//
// Pas de simplification symbolique : l'arbre est seulement lu.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use std::fmt;

use super::trig::TrigFn;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(BigRational),
    Ident(String),

    Neg(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),

    // postfixés
    Factorielle(Box<Expr>),
    Pourcent(Box<Expr>),
    Degres(Box<Expr>),

    Appel(Fonction, Vec<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sqrt,
    Cbrt,
    NthRoot,
    Abs,
    Exp,
    Ln,
    Log10,
    Log2,
    /// log(x) = ln x ; log(x, b) = ln x / ln b
    Log,
    Trig(TrigFn),
}

impl Fonction {
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        let f = match nom {
            "sqrt" => Fonction::Sqrt,
            "cbrt" => Fonction::Cbrt,
            "nthroot" => Fonction::NthRoot,
            "abs" => Fonction::Abs,
            "exp" => Fonction::Exp,
            "log_natural" | "ln" => Fonction::Ln,
            "log10" | "lg" => Fonction::Log10,
            "log2" => Fonction::Log2,
            "log" => Fonction::Log,
            autre => Fonction::Trig(TrigFn::depuis_nom(autre)?),
        };
        Some(f)
    }

    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sqrt => "sqrt",
            Fonction::Cbrt => "cbrt",
            Fonction::NthRoot => "nthRoot",
            Fonction::Abs => "abs",
            Fonction::Exp => "exp",
            Fonction::Ln => "log_natural",
            Fonction::Log10 => "log10",
            Fonction::Log2 => "log2",
            Fonction::Log => "log",
            Fonction::Trig(f) => f.nom(),
        }
    }

    /// (min, max) arguments acceptés.
    pub fn arite(self) -> (usize, usize) {
        match self {
            Fonction::Log | Fonction::NthRoot => (1, 2),
            _ => (1, 1),
        }
    }

    pub fn arite_texte(self) -> &'static str {
        match self.arite() {
            (1, 2) => "1 ou 2",
            _ => "1",
        }
    }
}

impl Expr {
    /// Détecte un coeff·π (Add/Sub/Neg/Mul/Div par des rationnels).
    /// Ex: pi/2 -> 1/2 ; 3*pi/2 -> 3/2 ; -(pi/6) -> -1/6 ; pi/4+pi/4 -> 1/2
    pub fn coeff_pi(&self) -> Option<BigRational> {
        use Expr::*;

        match self {
            Ident(nom) if nom == "pi" => Some(BigRational::one()),

            Neg(x) => Some(-x.coeff_pi()?),

            Add(a, b) => Some(a.coeff_pi()? + b.coeff_pi()?),
            Sub(a, b) => Some(a.coeff_pi()? - b.coeff_pi()?),

            Mul(a, b) => match (a.as_ref(), b.as_ref()) {
                (Nombre(r), x) | (x, Nombre(r)) => Some(r * x.coeff_pi()?),
                _ => None,
            },

            Div(a, b) => match b.as_ref() {
                Nombre(r) if !r.is_zero() => Some(a.coeff_pi()? / r),
                _ => None,
            },

            _ => None,
        }
    }
}

/// π·coeff en degrés, si c'est un entier représentable.
pub(crate) fn coeff_pi_en_degres(coeff: &BigRational) -> Option<i64> {
    let deg = coeff * BigRational::from_integer(BigInt::from(180));
    if !deg.denom().is_one() {
        return None;
    }
    deg.numer().to_i64()
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Nombre(r) => {
                if r.denom().is_one() {
                    write!(f, "{}", r.numer())
                } else {
                    write!(f, "{}/{}", r.numer(), r.denom())
                }
            }
            Ident(nom) => write!(f, "{nom}"),
            Neg(x) => write!(f, "-({x})"),
            Add(a, b) => write!(f, "({a} + {b})"),
            Sub(a, b) => write!(f, "({a} - {b})"),
            Mul(a, b) => write!(f, "({a} * {b})"),
            Div(a, b) => write!(f, "({a} / {b})"),
            Pow(a, b) => write!(f, "({a}^{b})"),
            Factorielle(x) => write!(f, "({x})!"),
            Pourcent(x) => write!(f, "({x})%"),
            Degres(x) => write!(f, "({x})°"),
            Appel(fonction, args) => {
                write!(f, "{}(", fonction.nom())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}
