use crate::cli::parse::{parse_amount, parse_invoice_list};
use crate::models::MatchResult;
use crate::service::{Session, SessionError, SubsetMatcher};
use std::io::{self, BufRead, Write};

const MENU: &str = "\nSimple Accounting Program
1. Add a list of invoices
2. Enter the target value
3. Enter the tolerance percentage
4. Find closest invoices subset
5. Exit";

/// 菜单结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// 用户选择退出
    Quit,
    /// 输入流结束
    EndOfInput,
    /// 旧版行为: 未设置 target 就搜索
    MissingTarget,
}

/// 交互菜单: 读取命令, 更新会话, 打印结果
pub struct Menu<'a, R, W> {
    session: Session,
    matcher: &'a SubsetMatcher,
    exit_on_missing_target: bool,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(session: Session, matcher: &'a SubsetMatcher, exit_on_missing_target: bool, input: R, output: W) -> Self {
        Self {
            session,
            matcher,
            exit_on_missing_target,
            input,
            output,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 主循环, 直到退出或输入结束
    pub fn run(&mut self) -> io::Result<MenuExit> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(MenuExit::EndOfInput);
            };

            // 与原始输入逐字比较, " 1" 视为无效选项
            let exit = match choice.as_str() {
                "1" => self.add_invoices()?,
                "2" => self.enter_target()?,
                "3" => self.enter_tolerance()?,
                "4" => self.find_closest()?,
                "5" => {
                    writeln!(self.output, "Goodbye!")?;
                    Some(MenuExit::Quit)
                }
                other => {
                    tracing::debug!("Unknown menu choice {:?}", other);
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    None
                }
            };

            if let Some(exit) = exit {
                tracing::info!("Menu session finished: {:?}", exit);
                return Ok(exit);
            }
        }
    }

    fn add_invoices(&mut self) -> io::Result<Option<MenuExit>> {
        let Some(line) = self.prompt("Enter a list of invoices, Separated by comma: ")? else {
            return Ok(Some(MenuExit::EndOfInput));
        };
        match parse_invoice_list(&line) {
            Ok(invoices) => {
                writeln!(self.output, "You entered:  {:?}", invoices)?;
                self.session.set_invoices(invoices);
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(None)
    }

    fn enter_target(&mut self) -> io::Result<Option<MenuExit>> {
        let Some(line) = self.prompt("Target value: ")? else {
            return Ok(Some(MenuExit::EndOfInput));
        };
        match parse_amount("target", &line) {
            Ok(target) => self.session.set_target(target),
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(None)
    }

    fn enter_tolerance(&mut self) -> io::Result<Option<MenuExit>> {
        let Some(line) = self.prompt("Tolerance percentage: ")? else {
            return Ok(Some(MenuExit::EndOfInput));
        };
        match parse_amount("tolerance", &line) {
            Ok(tolerance) => self.session.set_tolerance(tolerance),
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(None)
    }

    fn find_closest(&mut self) -> io::Result<Option<MenuExit>> {
        match self.session.find_closest(self.matcher) {
            Ok(result @ MatchResult::Found(_)) => {
                writeln!(self.output, "Result: {}", serde_json::to_string(&result)?)?;
            }
            Ok(MatchResult::NoMatch) => {
                writeln!(self.output, "Result: {}", MatchResult::NoMatch)?;
            }
            Err(SessionError::MissingTarget) if self.exit_on_missing_target => {
                return Ok(Some(MenuExit::MissingTarget));
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(None)
    }

    /// 打印提示并读取一行; 输入结束时返回 None
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatcherConfig, SessionConfig};
    use std::io::Cursor;

    fn run_menu(script: &str, exit_on_missing_target: bool) -> (MenuExit, String, Session) {
        let matcher = SubsetMatcher::new(MatcherConfig::default());
        let session = Session::new(&SessionConfig::default());
        let mut output = Vec::new();
        let mut menu = Menu::new(
            session,
            &matcher,
            exit_on_missing_target,
            Cursor::new(script.as_bytes().to_vec()),
            &mut output,
        );
        let exit = menu.run().unwrap();
        let session = menu.session().clone();
        drop(menu);
        (exit, String::from_utf8(output).unwrap(), session)
    }

    #[test]
    fn full_search_round() {
        let (exit, out, session) = run_menu("1\n5,3,7,2\n2\n10\n3\n0\n4\n5\n", false);
        assert_eq!(exit, MenuExit::Quit);
        assert!(out.contains("You entered:  [5, 3, 7, 2]"));
        assert!(out.contains(r#"Result: {"status":"found","subset":[3,7],"indices":[1,2],"sum":10,"error_percentage":0.0}"#));
        assert!(out.ends_with("Goodbye!\n"));
        assert_eq!(session.target(), Some(10));
    }

    #[test]
    fn no_match_prints_message() {
        let (_, out, _) = run_menu("1\n1,2,3\n2\n100\n3\n0\n4\n", false);
        assert!(out.contains("Result: No subset found within the given tolerance."));
    }

    #[test]
    fn missing_target_keeps_session_alive() {
        let (exit, out, _) = run_menu("4\n2\n10\n5\n", false);
        assert_eq!(exit, MenuExit::Quit);
        assert!(out.contains("Error: no target value entered"));
    }

    #[test]
    fn missing_target_can_end_session() {
        let (exit, out, _) = run_menu("1\n1,2\n4\n5\n", true);
        assert_eq!(exit, MenuExit::MissingTarget);
        assert!(!out.contains("Goodbye!"));
    }

    #[test]
    fn garbage_input_is_rejected_before_search() {
        let (exit, out, session) = run_menu("1\n1,x\n2\nabc\n9\n", false);
        assert_eq!(exit, MenuExit::EndOfInput);
        assert!(out.contains("Error: invalid invoice amount \"x\""));
        assert!(out.contains("Error: invalid target \"abc\""));
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(session.invoices().is_empty());
        assert_eq!(session.target(), None);
    }

    #[test]
    fn zero_target_prints_infinite_percentage() {
        let (_, out, _) = run_menu("1\n1,2\n2\n0\n3\n5\n4\n5\n", false);
        assert!(out.contains(r#"Result: {"status":"found","subset":[1],"indices":[0],"sum":1,"error_percentage":"inf"}"#));
    }

    #[test]
    fn zero_target_with_exact_zero_prints_nan() {
        let (_, out, _) = run_menu("1\n0,2\n2\n0\n3\n5\n4\n5\n", false);
        assert!(out.contains(r#"Result: {"status":"found","subset":[0],"indices":[0],"sum":0,"error_percentage":"NaN"}"#));
    }

    #[test]
    fn padded_choice_is_invalid() {
        let (exit, out, session) = run_menu(" 2\n5\n", false);
        assert_eq!(exit, MenuExit::Quit);
        assert!(out.contains("Invalid choice. Please try again."));
        assert_eq!(session.target(), None);
    }

    #[test]
    fn default_tolerance_used_when_never_entered() {
        let (_, _, session) = run_menu("1\n5\n2\n5\n4\n", false);
        assert_eq!(session.tolerance(), Some(90000));
    }
}
