// Abstract Syntax Tree for the mini-Pascal language.
//
// program    = [ "VAR" ident { "," ident } ";" ] { procedure } statement "." ;
// procedure  = "PROCEDURE" ident "(" [ ident { "," ident } ] ")" ";"
//              { "VAR" ident { "," ident } ";" } statement ;
// statement  = "WRITELN" "(" expression ")" ";"
//            | "READLN" "(" ident ")" ";"
//            | "BEGIN" { statement } "END" ";"
//            | "IF" condition "THEN" statement [ "ELSE" statement ]
//            | "WHILE" condition "DO" statement
//            | ident ":=" expression ";" ;
// condition  = expression ( "=" | "<>" | "<" | ">" | "<=" | ">=" ) expression ;
// expression = term { ( "+" | "-" ) term } ;
// term       = factor { ( "*" | "/" | "mod" ) factor } ;
// factor     = "(" expression ")" | "-" factor | number
//            | ident [ "(" [ expression { "," expression } ] ")" ] ;
//
// Nodes are closed enums; interpretation lives in `crate::interpreter` and
// code generation in `crate::codegen`, each as an exhaustive match.

mod expressions;
mod program;
mod statements;

pub use expressions::{BinaryOperator, Condition, Expression, RelationalOperator};
pub use program::{ProcedureDeclaration, Program};
pub use statements::Statement;
