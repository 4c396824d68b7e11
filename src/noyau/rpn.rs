// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr (arité des fonctions vérifiée ici)
//
// Règles:
// - Ident(name):
//    - fonction connue suivie de '(' => appel (arité comptée aux virgules)
//    - sinon => atome (Expr::Ident), lecture.rs décidera
// - Moins unaire:
//    - opérateur PRÉFIXE Neg, entre * / et ^ : "-2^2" => -(2^2), "2*-3" => 2*(-3)
// - Plus unaire ignoré.
// - Postfixés (! % deg) : sortie directe, ils s'appliquent à la valeur qui précède.

use num_rational::BigRational;
use num_traits::One;

use super::erreurs::ErreurEval;
use super::expr::{Expr, Fonction};
use super::jetons::Tok;

/// Au-delà, l'arbre est refusé (lecture.rs est récursive).
pub const MAX_PROFONDEUR_ARBRE: usize = 512;

#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Num(BigRational),
    Ident(String),
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Fact,
    Pourcent,
    Deg,
    /// nom de fonction, nombre d'arguments
    Appel(String, usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
}

/// Pile d'opérateurs : Appel = "nom(" (la parenthèse appartient à la fonction).
#[derive(Clone, Debug)]
enum Pile {
    Op(Op),
    LPar,
    Appel(String),
}

fn precedence(op: Op) -> i32 {
    match op {
        Op::Add | Op::Sub => 1,
        Op::Mul | Op::Div => 2,
        Op::Neg => 3,
        Op::Pow => 4,
    }
}

fn is_right_associative(op: Op) -> bool {
    matches!(op, Op::Pow | Op::Neg)
}

fn op_vers_rpn(op: Op) -> Rpn {
    match op {
        Op::Add => Rpn::Add,
        Op::Sub => Rpn::Sub,
        Op::Mul => Rpn::Mul,
        Op::Div => Rpn::Div,
        Op::Pow => Rpn::Pow,
        Op::Neg => Rpn::Neg,
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Ident("pi"), Num(2), Div, Appel("sin", 1)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Rpn>, ErreurEval> {
    if tokens.is_empty() {
        return Err(ErreurEval::Vide);
    }

    let mut out: Vec<Rpn> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Pile> = Vec::new();
    // un compteur d'arguments par appel ouvert
    let mut arites: Vec<usize> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les opérandes manquants.
    let mut prev_was_value = false;

    let mut i = 0usize;
    while i < tokens.len() {
        let tok = &tokens[i];
        i += 1;

        match tok {
            Tok::Num(r) => {
                if prev_was_value {
                    return Err(ErreurEval::Syntaxe("opérateur manquant"));
                }
                out.push(Rpn::Num(r.clone()));
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(ErreurEval::Syntaxe("opérateur manquant"));
                }
                if Fonction::depuis_nom(name).is_some() {
                    if tokens.get(i) != Some(&Tok::LPar) {
                        return Err(ErreurEval::Syntaxe("fonction sans parenthèses"));
                    }
                    i += 1;
                    ops.push(Pile::Appel(name.clone()));
                    arites.push(1);
                    prev_was_value = false;
                } else {
                    out.push(Rpn::Ident(name.clone()));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(ErreurEval::Syntaxe("opérateur manquant"));
                }
                ops.push(Pile::LPar);
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err(ErreurEval::Syntaxe("opérande manquant"));
                }
                // dépile jusqu'à '(' ou "nom("
                loop {
                    match ops.pop() {
                        Some(Pile::Op(op)) => out.push(op_vers_rpn(op)),
                        Some(Pile::LPar) => break,
                        Some(Pile::Appel(name)) => {
                            let n = arites.pop().ok_or(ErreurEval::Parentheses)?;
                            out.push(Rpn::Appel(name, n));
                            break;
                        }
                        None => return Err(ErreurEval::Parentheses),
                    }
                }
                prev_was_value = true;
            }

            Tok::Comma => {
                if !prev_was_value {
                    return Err(ErreurEval::Syntaxe("opérande manquant"));
                }
                // dépile jusqu'à l'appel courant (une virgule hors appel est refusée)
                loop {
                    match ops.last() {
                        Some(Pile::Op(op)) => {
                            out.push(op_vers_rpn(*op));
                            ops.pop();
                        }
                        Some(Pile::Appel(_)) => break,
                        Some(Pile::LPar) | None => {
                            return Err(ErreurEval::Syntaxe("virgule hors d'un appel"))
                        }
                    }
                }
                if let Some(n) = arites.last_mut() {
                    *n += 1;
                }
                prev_was_value = false;
            }

            Tok::Bang | Tok::Percent | Tok::Deg => {
                if !prev_was_value {
                    return Err(ErreurEval::Syntaxe("opérande manquant"));
                }
                out.push(match tok {
                    Tok::Bang => Rpn::Fact,
                    Tok::Percent => Rpn::Pourcent,
                    _ => Rpn::Deg,
                });
            }

            Tok::Egal => return Err(ErreurEval::Syntaxe("'=' inattendu")),

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let op = if prev_was_value {
                    match tok {
                        Tok::Plus => Op::Add,
                        Tok::Minus => Op::Sub,
                        Tok::Star => Op::Mul,
                        Tok::Slash => Op::Div,
                        _ => Op::Pow,
                    }
                } else {
                    match tok {
                        // plus unaire : rien à faire
                        Tok::Plus => continue,
                        Tok::Minus => Op::Neg,
                        _ => return Err(ErreurEval::Syntaxe("opérande manquant")),
                    }
                };

                // un opérateur préfixe ne ferme rien : il s'empile tel quel
                if op != Op::Neg {
                    while let Some(Pile::Op(top)) = ops.last() {
                        let p_top = precedence(*top);
                        let p_tok = precedence(op);

                        let doit_pop = if is_right_associative(op) {
                            p_top > p_tok
                        } else {
                            p_top >= p_tok
                        };

                        if !doit_pop {
                            break;
                        }
                        out.push(op_vers_rpn(*top));
                        ops.pop();
                    }
                }

                ops.push(Pile::Op(op));
                prev_was_value = false;
            }
        }
    }

    if !prev_was_value {
        return Err(ErreurEval::Syntaxe("opérande manquant"));
    }

    // vide la pile ops
    while let Some(p) = ops.pop() {
        match p {
            Pile::Op(op) => out.push(op_vers_rpn(op)),
            Pile::LPar | Pile::Appel(_) => return Err(ErreurEval::Parentheses),
        }
    }

    Ok(out)
}

/// Construit une Expr à partir d'une RPN.
///
/// Chaque entrée de pile porte sa profondeur : au-delà de MAX_PROFONDEUR_ARBRE,
/// on refuse (TropProfond) au lieu de construire.
pub fn from_rpn(rpn: &[Rpn]) -> Result<Expr, ErreurEval> {
    let mut st: Vec<(Expr, usize)> = Vec::new();

    let profondeur = |p: usize| {
        if p > MAX_PROFONDEUR_ARBRE {
            Err(ErreurEval::TropProfond(MAX_PROFONDEUR_ARBRE))
        } else {
            Ok(p)
        }
    };

    for r in rpn {
        match r {
            Rpn::Num(v) => st.push((Expr::Nombre(v.clone()), 1)),
            Rpn::Ident(name) => st.push((Expr::Ident(name.clone()), 1)),

            Rpn::Neg | Rpn::Fact | Rpn::Pourcent | Rpn::Deg => {
                let (x, p) = st.pop().ok_or(ErreurEval::Syntaxe("opérande manquant"))?;
                let p = profondeur(p + 1)?;
                let x = Box::new(x);
                let e = match r {
                    Rpn::Neg => Expr::Neg(x),
                    Rpn::Fact => Expr::Factorielle(x),
                    Rpn::Pourcent => Expr::Pourcent(x),
                    _ => Expr::Degres(x),
                };
                st.push((e, p));
            }

            Rpn::Add | Rpn::Sub | Rpn::Mul | Rpn::Div | Rpn::Pow => {
                let (b, pb) = st.pop().ok_or(ErreurEval::Syntaxe("opérande manquant"))?;
                let (a, pa) = st.pop().ok_or(ErreurEval::Syntaxe("opérande manquant"))?;
                let p = profondeur(pa.max(pb) + 1)?;

                let (a, b) = (Box::new(a), Box::new(b));
                let e = match r {
                    Rpn::Add => Expr::Add(a, b),
                    Rpn::Sub => Expr::Sub(a, b),
                    Rpn::Mul => Expr::Mul(a, b),
                    Rpn::Div => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                };
                st.push((e, p));
            }

            Rpn::Appel(name, n) => {
                let f = Fonction::depuis_nom(name)
                    .ok_or_else(|| ErreurEval::Symbole(name.clone()))?;
                let (min, max) = f.arite();
                if *n < min || *n > max || *n > st.len() {
                    return Err(ErreurEval::Arite {
                        nom: f.nom(),
                        attendu: f.arite_texte(),
                        recu: *n,
                    });
                }

                let args: Vec<(Expr, usize)> = st.split_off(st.len() - n);
                let p_max = args.iter().map(|(_, p)| *p).max().unwrap_or(0);
                let p = profondeur(p_max + 1)?;
                let args = args.into_iter().map(|(e, _)| e).collect();
                st.push((Expr::Appel(f, args), p));
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        (None, _) => Err(ErreurEval::Vide),
        _ => Err(ErreurEval::Syntaxe("opérateur manquant")),
    }
}

/// Format utilitaire (“démarche”) : RPN en texte.
pub fn format_rpn(rpn: &[Rpn]) -> String {
    rpn.iter()
        .map(|r| match r {
            Rpn::Num(v) => {
                if v.denom().is_one() {
                    format!("{}", v.numer())
                } else {
                    format!("{}/{}", v.numer(), v.denom())
                }
            }
            Rpn::Ident(name) => name.clone(),
            Rpn::Add => "+".to_string(),
            Rpn::Sub => "-".to_string(),
            Rpn::Mul => "*".to_string(),
            Rpn::Div => "/".to_string(),
            Rpn::Pow => "^".to_string(),
            Rpn::Neg => "neg".to_string(),
            Rpn::Fact => "!".to_string(),
            Rpn::Pourcent => "%".to_string(),
            Rpn::Deg => "deg".to_string(),
            Rpn::Appel(name, n) => format!("{name}/{n}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
