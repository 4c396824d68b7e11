// src/noyau/jetons.rs
//
// Tokenisation d'une expression NORMALISÉE (sortie de normalise.rs).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::erreurs::ErreurEval;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    // Fonctions, constantes, variables : le parse (RPN->Expr) décidera.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    // postfixés
    Bang,    // !
    Percent, // %
    Deg,     // unité degré

    Comma, // séparateur d'arguments
    Egal,  // x=1

    LPar,
    RPar,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - décimaux exacts (12, 0.5, .5) -> Num(rationnel)
/// - opérateurs + - * / ^ ! % =
/// - parenthèses ( ) et virgule d'arguments
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
/// - "deg" (suffixe d'unité)
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurEval> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '!' => Some(Tok::Bang),
            '%' => Some(Tok::Percent),
            ',' => Some(Tok::Comma),
            '=' => Some(Tok::Egal),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let w = word.to_lowercase();
            if w == "deg" {
                out.push(Tok::Deg);
            } else {
                out.push(Tok::Ident(w));
            }
            continue;
        }

        // Décimal : chiffres [ . chiffres ]  ou  . chiffres
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let txt: String = chars[start..i].iter().collect();
            out.push(Tok::Num(decimal_exact(&txt)?));
            continue;
        }

        return Err(ErreurEval::CaractereInattendu(c));
    }

    Ok(out)
}

/// "12.375" -> 12375/1000 (sans passer par f64).
fn decimal_exact(txt: &str) -> Result<BigRational, ErreurEval> {
    let invalide = || ErreurEval::NombreInvalide(txt.to_string());

    let (ent, frac) = match txt.split_once('.') {
        Some((e, f)) => (e, f),
        None => (txt, ""),
    };
    if frac.contains('.') || (ent.is_empty() && frac.is_empty()) {
        return Err(invalide());
    }

    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(invalide)?;
    if frac.is_empty() {
        return Ok(BigRational::from_integer(n));
    }
    let d = BigInt::from(10).pow(frac.len() as u32);
    Ok(BigRational::new(n, d))
}

/// Format utilitaire (“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    fn format_rat(r: &BigRational) -> String {
        let n = r.numer();
        let d = r.denom();
        if d.is_one() {
            format!("{n}")
        } else {
            format!("{n}/{d}")
        }
    }

    tokens
        .iter()
        .map(|t| match t {
            Tok::Num(r) => format_rat(r),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),

            Tok::Bang => "!".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::Deg => "deg".to_string(),

            Tok::Comma => ",".to_string(),
            Tok::Egal => "=".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
